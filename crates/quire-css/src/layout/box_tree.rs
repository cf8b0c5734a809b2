//! The box tree: what the assembler hands to the typesetting backend.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Boxes are produced top-down and own their children. Vertical margins are
//! not part of a box's own geometry: the parent turns them into [`Spacer`]s
//! while collapsing adjacent margins, so a placed box only ever applies its
//! horizontal margins.

use serde::Serialize;

use super::box_model::{Corners, EdgeSizes, Side, Sides};
use super::inline::{InlineRun, RunStyle};
use super::table::TableBox;
use crate::style::{BorderStyle, ColorValue, StyleFrame};

/// A node of the box tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "box", rename_all = "kebab-case")]
pub enum LayoutBox {
    /// Vertical space between blocks (a collapsed margin).
    Spacer(Spacer),
    /// A paragraph: one inline run inside an optional box.
    Inline(InlineBox),
    /// A vertical stack of boxes inside an optional box.
    Block(BlockBox),
    /// A table grid.
    Table(TableBox),
    /// Content that produces nothing (`display: none`, `<br>` at block level).
    Empty,
}

impl LayoutBox {
    /// True for [`LayoutBox::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The box decoration, if this kind of box has one.
    #[must_use]
    pub const fn decoration(&self) -> Option<&Decoration> {
        match self {
            Self::Inline(b) => Some(&b.decoration),
            Self::Block(b) => Some(&b.decoration),
            Self::Table(t) => Some(&t.decoration),
            Self::Spacer(_) | Self::Empty => None,
        }
    }

    /// Top margin, collapsed by the parent.
    #[must_use]
    pub fn margin_top(&self) -> f32 {
        self.decoration().map_or(0.0, |d| d.margin.top)
    }

    /// Bottom margin, collapsed by the parent.
    #[must_use]
    pub fn margin_bottom(&self) -> f32 {
        self.decoration().map_or(0.0, |d| d.margin.bottom)
    }

    /// The generating tag, empty for anonymous boxes.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Inline(b) => &b.tag,
            Self::Block(b) => &b.tag,
            Self::Table(t) => &t.tag,
            Self::Spacer(_) | Self::Empty => "",
        }
    }
}

/// Why a spacer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacerOrigin {
    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// "the resulting margin width is the maximum of the collapsing margins'
    /// widths."
    CollapsedMargin,
    /// The bottom margin of the last child of a stack.
    TrailingMargin,
}

/// Fixed vertical space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spacer {
    /// Height in points.
    pub height: f32,
    /// Why the space is there.
    pub origin: SpacerOrigin,
}

/// Margins, borders, padding, corner radii and background of a box.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Decoration {
    /// Margins. Only left and right are applied by the box itself.
    pub margin: EdgeSizes,
    /// Border widths.
    pub border: EdgeSizes,
    /// Border colors.
    pub border_colors: Sides<ColorValue>,
    /// Border styles.
    pub border_styles: Sides<BorderStyle>,
    /// Padding.
    pub padding: EdgeSizes,
    /// Corner radii.
    pub radii: Corners,
    /// Background behind padding and content.
    pub background: Option<ColorValue>,
}

impl Decoration {
    /// The decoration a frame asks for.
    #[must_use]
    pub fn from_frame(frame: &StyleFrame) -> Self {
        let mut border_colors = Sides::uniform(frame.color);
        for side in Side::ALL {
            *border_colors.side_mut(side) = frame.border_color(side);
        }
        Self {
            margin: frame.margin,
            border: frame.border_widths,
            border_colors,
            border_styles: frame.border_styles,
            padding: frame.padding,
            radii: frame.radii,
            background: frame.background_color,
        }
    }

    /// True if anything is drawn around the content.
    #[must_use]
    pub fn has_box(&self) -> bool {
        self.background.is_some()
            || self.border.horizontal() + self.border.vertical() > 0.0
            || self.padding.horizontal() + self.padding.vertical() > 0.0
    }

    /// Horizontal space taken outside the content: margins, borders, padding.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.margin.horizontal() + self.border.horizontal() + self.padding.horizontal()
    }

    /// Vertical space taken by borders and padding (margins excluded).
    #[must_use]
    pub fn inner_vertical(&self) -> f32 {
        self.border.vertical() + self.padding.vertical()
    }
}

/// A list marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Marker text ("•", "3.", "iv.").
    pub text: String,
    /// Marker style, the list item's own.
    pub style: RunStyle,
}

/// A paragraph box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineBox {
    /// Generating tag; empty for anonymous paragraphs.
    pub tag: String,
    /// The paragraph content.
    pub run: InlineRun,
    /// Box decoration.
    pub decoration: Decoration,
    /// Content width the paragraph is formatted to.
    pub width: f32,
    /// List marker, hung into the indent gutter.
    pub marker: Option<Marker>,
}

/// A vertical stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockBox {
    /// Generating tag; empty for the anonymous root.
    pub tag: String,
    /// Children, top to bottom, with spacers for collapsed margins.
    pub children: Vec<LayoutBox>,
    /// Box decoration, wrapping the whole stack.
    pub decoration: Decoration,
    /// Content width of the stack.
    pub width: f32,
    /// List marker, hung left of the first child.
    pub marker: Option<Marker>,
}
