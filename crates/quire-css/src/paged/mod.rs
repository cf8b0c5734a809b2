//! Paged media: page rules, paper sizes, page masters and margin boxes.
//!
//! [CSS Paged Media Module Level 3](https://www.w3.org/TR/css-page-3/)

pub mod margin_box;
pub mod master;
pub mod paper;
pub mod rule;

pub use margin_box::{
    MarginArea, MarginBoxSpec, has_contents, literal_content, paint_margin_boxes,
    paint_page_background,
};
pub use master::{PageMaster, PageMasters};
pub use paper::{PageSize, PaperName};
pub use rule::{PageRule, PageSelector, PropertyMap, declarations};
