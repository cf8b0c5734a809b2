//! Style resolution: values, frames and the inheritance stack.
//!
//! - [`length`] turns CSS sizes into points
//! - [`color`] parses CSS colors
//! - [`property`] recognizes property names and expands shorthands
//! - [`frame`] holds the resolved style of one element
//! - [`stack`] scopes frames to the traversal

pub mod color;
pub mod frame;
pub mod length;
pub mod property;
pub mod stack;

pub use color::ColorValue;
pub use frame::{
    BorderStyle, FontStyle, Indent, LineHeight, ListStyleType, StyleFrame, TextAlign,
    VerticalAlign, resolve_font_weight,
};
pub use length::{resolve, resolve_line_height, resolve_width};
pub use property::{Property, StyleDeclaration, expand_shorthand, parse_declarations};
pub use stack::{StyleGuard, StyleStack};
