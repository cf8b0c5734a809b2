//! Painting: display lists at absolute page coordinates.
//!
//! - [`display_list`] holds the drawing commands
//! - [`placer`] walks a box tree and emits them

pub mod display_list;
pub mod placer;

pub use display_list::{DisplayCommand, DisplayList};
pub use placer::{Placer, decorate};
