//! Display list: positioned drawing commands for one page.
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! Commands are in painting order, back to front, at absolute page
//! coordinates in points (origin top-left, y down).

use serde::Serialize;

use crate::layout::inline::RunStyle;
use crate::layout::{Corners, EdgeSizes, Sides};
use crate::style::{BorderStyle, ColorValue};

/// A single drawing command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    ///
    /// Used for page and box backgrounds.
    FillRect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Fill color.
        color: ColorValue,
        /// [§ 5 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
        radii: Corners,
    },

    /// Stroke the border of a box.
    ///
    /// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
    ///
    /// The rectangle is the border box; each side is drawn inward by its own
    /// width. Sides with zero width are not drawn.
    StrokeBorder {
        /// Left edge of the border box.
        x: f32,
        /// Top edge of the border box.
        y: f32,
        /// Border box width.
        width: f32,
        /// Border box height.
        height: f32,
        /// Width per side.
        widths: EdgeSizes,
        /// Color per side.
        colors: Sides<ColorValue>,
        /// Line style per side.
        styles: Sides<BorderStyle>,
        /// Corner radii of the outer edge.
        radii: Corners,
    },

    /// Draw a run of text.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    DrawText {
        /// Start of the baseline.
        x: f32,
        /// Baseline position.
        y: f32,
        /// The text.
        text: String,
        /// Font, size, weight, color.
        style: RunStyle,
        /// Link target, for backends that emit link annotations.
        href: Option<String>,
    },

    /// Draw an image.
    DrawImage {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Used width.
        width: f32,
        /// Used height.
        height: f32,
        /// Image source.
        src: String,
        /// Link target.
        href: Option<String>,
    },
}

impl DisplayCommand {
    fn translate(&mut self, dx: f32, dy: f32) {
        let (x, y) = match self {
            Self::FillRect { x, y, .. }
            | Self::StrokeBorder { x, y, .. }
            | Self::DrawText { x, y, .. }
            | Self::DrawImage { x, y, .. } => (x, y),
        };
        *x += dx;
        *y += dy;
    }
}

/// A list of drawing commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Append every command of `other`, keeping their order.
    pub fn extend(&mut self, other: Self) {
        self.commands.extend(other.commands);
    }

    /// Move every command by `(dx, dy)`.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for command in &mut self.commands {
            command.translate(dx, dy);
        }
    }

    /// Get all commands in the display list.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// The text of every `DrawText`, in painting order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DisplayCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if there are no commands.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
