//! Box generation.
//!
//! - [`assembler`] turns classified flow items into a box tree
//! - [`inline`] builds the runs handed to the paragraph formatter
//! - [`table`] builds table grids
//! - [`marker`] formats list markers
//! - [`backend`] is the typesetting seam, with an approximate reference
//!   implementation
//! - [`box_model`] and [`box_tree`] hold the geometry and output types

pub mod assembler;
pub mod backend;
pub mod box_model;
pub mod box_tree;
pub mod inline;
pub mod marker;
pub mod table;

pub use assembler::{LayoutAssembler, LayoutContext, paragraph_settings};
pub use backend::{ApproximateTypesetter, FontFamilyId, Typesetter};
pub use box_model::{Corners, EdgeSizes, Rect, Side, Sides};
pub use box_tree::{
    BlockBox, Decoration, InlineBox, LayoutBox, Marker, Spacer, SpacerOrigin,
};
pub use inline::{
    FragmentContent, ImageItem, InlineItem, InlineRun, InlineRunBuilder, LineBox, LineFragment,
    ParagraphLayout, ParagraphSettings, RunStyle, TextSegment,
};
pub use marker::marker_text;
pub use table::{CellPlacement, RowGroup, TableBox, TableCell, TableGrid, TableRow};
