//! Page-margin boxes.
//!
//! [CSS Paged Media § 5 Page-Margin Boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)
//!
//! "The page-margin boxes are laid out in the page margin." Each of the
//! sixteen areas holds at most one paragraph of literal text, set in the
//! document's default font and wrapped in the area's own border and
//! background.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use super::master::PageMaster;
use crate::error::LayoutError;
use crate::layout::{
    Decoration, EdgeSizes, InlineBox, InlineRunBuilder, LayoutAssembler, LayoutBox, Rect,
    paragraph_settings,
};
use crate::paint::{DisplayCommand, DisplayList, Placer};
use crate::style::{Property, StyleDeclaration, TextAlign, VerticalAlign};

/// The sixteen margin areas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum MarginArea {
    TopLeftCorner,
    TopLeft,
    TopCenter,
    TopRight,
    TopRightCorner,
    RightTop,
    RightMiddle,
    RightBottom,
    BottomRightCorner,
    BottomRight,
    BottomCenter,
    BottomLeft,
    BottomLeftCorner,
    LeftBottom,
    LeftMiddle,
    LeftTop,
}

impl MarginArea {
    /// Areas in painting order: clockwise from the top-left corner.
    pub const PAINT_ORDER: [Self; 16] = [
        Self::TopLeftCorner,
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::TopRightCorner,
        Self::RightTop,
        Self::RightMiddle,
        Self::RightBottom,
        Self::BottomRightCorner,
        Self::BottomRight,
        Self::BottomCenter,
        Self::BottomLeft,
        Self::BottomLeftCorner,
        Self::LeftBottom,
        Self::LeftMiddle,
        Self::LeftTop,
    ];

    /// The area's rectangle on a `width` × `height` page with `margin`.
    ///
    /// Corners fill the corner squares. Top and bottom areas span the band
    /// between the left and right margins; left and right areas span the
    /// band between the top and bottom margins.
    #[must_use]
    pub fn rect(self, width: f32, height: f32, margin: &EdgeSizes) -> Rect {
        let inner_width = (width - margin.horizontal()).max(0.0);
        let inner_height = (height - margin.vertical()).max(0.0);
        let right = width - margin.right;
        let bottom = height - margin.bottom;
        match self {
            Self::TopLeftCorner => Rect::new(0.0, 0.0, margin.left, margin.top),
            Self::TopRightCorner => Rect::new(right, 0.0, margin.right, margin.top),
            Self::BottomRightCorner => Rect::new(right, bottom, margin.right, margin.bottom),
            Self::BottomLeftCorner => Rect::new(0.0, bottom, margin.left, margin.bottom),
            Self::TopLeft | Self::TopCenter | Self::TopRight => {
                Rect::new(margin.left, 0.0, inner_width, margin.top)
            }
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => {
                Rect::new(margin.left, bottom, inner_width, margin.bottom)
            }
            Self::LeftTop | Self::LeftMiddle | Self::LeftBottom => {
                Rect::new(0.0, margin.top, margin.left, inner_height)
            }
            Self::RightTop | Self::RightMiddle | Self::RightBottom => {
                Rect::new(right, margin.top, margin.right, inner_height)
            }
        }
    }

    /// Default horizontal alignment.
    #[must_use]
    pub const fn text_align(self) -> TextAlign {
        match self {
            Self::TopLeft | Self::BottomLeft => TextAlign::Left,
            Self::TopRight | Self::BottomRight => TextAlign::Right,
            _ => TextAlign::Center,
        }
    }

    /// Default vertical alignment.
    #[must_use]
    pub const fn vertical_align(self) -> VerticalAlign {
        match self {
            Self::LeftTop | Self::RightTop => VerticalAlign::Top,
            Self::LeftBottom | Self::RightBottom => VerticalAlign::Bottom,
            _ => VerticalAlign::Middle,
        }
    }
}

/// True if the last `content` declaration asks for something to be drawn.
///
/// [§ 5.3](https://www.w3.org/TR/css-page-3/#populating-margin-boxes)
/// "a margin box is generated if the computed value of its content property
/// is not none" (`normal` computes to `none` here).
#[must_use]
pub fn has_contents(declarations: &[StyleDeclaration]) -> bool {
    declarations
        .iter()
        .rev()
        .find(|d| d.property == Property::Content)
        .is_some_and(|d| {
            let value = d.value.trim();
            !value.eq_ignore_ascii_case("none") && !value.eq_ignore_ascii_case("normal")
        })
}

/// The quoted string segments of a `content` value, concatenated.
///
/// Anything outside quotes (`counter(page)`, `attr(x)`) is dropped.
#[must_use]
pub fn literal_content(value: &str) -> String {
    let mut text = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in value.chars() {
        match quote {
            Some(_) if escaped => {
                text.push(c);
                escaped = false;
            }
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => text.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None => {}
        }
    }
    text
}

/// A margin area with content, ready to be laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginBoxSpec {
    /// Which area.
    pub area: MarginArea,
    /// The area's declarations.
    pub declarations: Vec<StyleDeclaration>,
}

impl MarginBoxSpec {
    /// Lay out the area's content into `rect`.
    ///
    /// The text starts from the document's font, the one `<html>` or
    /// `<body>` set if either has been laid out.
    ///
    /// Returns `None` when the content has no literal text and the area
    /// draws no box.
    ///
    /// # Errors
    ///
    /// Malformed values and unknown fonts, as for any element.
    pub fn layout(
        &self,
        assembler: &mut LayoutAssembler<'_>,
        rect: Rect,
    ) -> Result<Option<(LayoutBox, VerticalAlign)>, LayoutError> {
        let tag = self.area.as_ref();
        let context = assembler.context();
        let mut frame = context.base_frame();
        if let Some(size) = context.root_font_size {
            frame.font_size = size;
        }
        frame.text_align = self.area.text_align();
        frame.vertical_align = self.area.vertical_align();
        frame.apply(&self.declarations, tag, context.root_font_size)?;

        let content = frame.content.as_deref().unwrap_or_default();
        let text = literal_content(content);
        let decoration = Decoration::from_frame(&frame);
        if text.is_empty() && !decoration.has_box() {
            return Ok(None);
        }

        let mut builder = InlineRunBuilder::new(paragraph_settings(&frame));
        let style = assembler.run_style(&frame, tag)?;
        builder.push_text(&text, style, None);
        let width = (rect.width - decoration.horizontal()).max(0.0);
        let layout_box = LayoutBox::Inline(InlineBox {
            tag: tag.to_string(),
            run: builder.finish(),
            decoration,
            width,
            marker: None,
        });
        Ok(Some((layout_box, frame.vertical_align)))
    }
}

/// Paint the page background over the whole sheet, and the page box's
/// border around the page area.
#[must_use]
pub fn paint_page_background(master: &PageMaster) -> DisplayList {
    let mut list = DisplayList::new();
    if let Some(color) = master.decoration.background {
        list.push(DisplayCommand::FillRect {
            x: 0.0,
            y: 0.0,
            width: master.size.width,
            height: master.size.height,
            color,
            radii: master.decoration.radii,
        });
    }
    let border = &master.decoration.border;
    if border.horizontal() + border.vertical() > 0.0 {
        let area = master.page_area();
        list.push(DisplayCommand::StrokeBorder {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height,
            widths: *border,
            colors: master.decoration.border_colors,
            styles: master.decoration.border_styles,
            radii: master.decoration.radii,
        });
    }
    list
}

/// Lay out and paint every margin box of `master`, in painting order.
///
/// # Errors
///
/// The first layout error of any area.
pub fn paint_margin_boxes(
    master: &PageMaster,
    assembler: &mut LayoutAssembler<'_>,
    placer: &Placer<'_>,
) -> Result<DisplayList, LayoutError> {
    let mut list = DisplayList::new();
    for spec in &master.areas {
        let rect = spec
            .area
            .rect(master.size.width, master.size.height, &master.margin);
        let Some((layout_box, vertical_align)) = spec.layout(assembler, rect)? else {
            continue;
        };
        let (mut area_list, height) = placer.paint(&layout_box, rect.x, rect.y, rect.width);
        let free = (rect.height - height).max(0.0);
        let offset = match vertical_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => free / 2.0,
            VerticalAlign::Bottom => free,
        };
        area_list.translate(0.0, offset);
        list.extend(area_list);
    }
    Ok(list)
}
