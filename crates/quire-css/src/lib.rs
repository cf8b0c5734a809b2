//! Style cascade, flow classification and box-model layout for the Quire
//! layout engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Value resolution** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Absolute units (pt, px, in, cm, mm, pc, q), `em`, `rem`, percentages
//!   - Font size keywords and `larger`/`smaller`
//!   - Colors (hex, `rgb()`/`rgba()`, named)
//!
//! - **Style stack** ([CSS Cascading Level 4 § 7](https://www.w3.org/TR/css-cascade-4/#inheriting))
//!   - One inheriting frame per element, popped on scope exit
//!
//! - **Flow classification** ([CSS Display Level 3](https://www.w3.org/TR/css-display-3/))
//!   - Block versus inline flow per element, whitespace collapsing
//!   - Presentational hints and `style` attributes
//!
//! - **Layout** ([CSS 2.1 § 8-10](https://www.w3.org/TR/CSS2/box.html))
//!   - Box decoration, margin collapsing, anonymous paragraphs
//!   - Inline runs, list markers, tables with spans
//!   - A typesetting backend seam with an approximate reference backend
//!
//! - **Paged media** ([CSS Paged Media Level 3](https://www.w3.org/TR/css-page-3/))
//!   - Page selectors, paper sizes, page masters, margin boxes
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Display lists at absolute page coordinates
//!
//! # Not Implemented
//!
//! - Selector matching: declarations arrive already cascaded per element
//! - Floats, positioning, flexbox, grid
//! - Glyph shaping and hyphenation (backend concerns)

/// Errors raised while resolving values and building boxes.
pub mod error;
/// Flow classification per [CSS Display Level 3](https://www.w3.org/TR/css-display-3/).
pub mod flow;
/// Box generation per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Page masters and margin boxes per [CSS Paged Media Level 3](https://www.w3.org/TR/css-page-3/).
pub mod paged;
/// Display list and placement per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Value resolution and style frames.
pub mod style;

pub use error::{LayoutError, ValueError};
pub use flow::{FlowDirection, FlowItem, FlowKind, classify};
pub use layout::{
    ApproximateTypesetter, LayoutAssembler, LayoutBox, LayoutContext, Typesetter,
};
pub use paged::{PageMaster, PageMasters, PageRule, PageSelector};
pub use paint::{DisplayCommand, DisplayList, Placer};
pub use style::{ColorValue, StyleFrame, StyleStack};
