//! Style frames: the resolved, inheritable style of one element.
//!
//! A frame starts as a clone of its parent ([`StyleFrame::inherit`]) and is
//! then overwritten by the element's own declarations
//! ([`StyleFrame::apply`]). Frames store used values in points; nothing is
//! re-interpreted after resolution.

use std::str::FromStr;

use quire_common::warning::warn_once;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::color::ColorValue;
use super::length::{
    self, NORMAL_LINE_HEIGHT, parse_factor, resolve, resolve_border_width,
};
use super::property::{Property, StyleDeclaration, split_components};
use crate::error::{LayoutError, ValueError};
use crate::layout::box_model::{Corners, EdgeSizes, Side, Sides};

/// [§ 3.3 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
    /// Slanted glyphs.
    Oblique,
}

/// [§ 7.1 text-align](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    #[strum(serialize = "left", serialize = "start")]
    Left,
    /// Flush right.
    #[strum(serialize = "right", serialize = "end")]
    Right,
    /// Centered.
    Center,
    /// Justified.
    Justify,
}

/// [§ 10.8.1 vertical-align](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
///
/// Only the values that make sense for table cells and margin boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    /// Align to the top.
    #[default]
    #[strum(serialize = "top", serialize = "baseline")]
    Top,
    /// Center vertically.
    Middle,
    /// Align to the bottom.
    Bottom,
}

/// [§ 4.2 Line Patterns: the 'border-style' properties](https://www.w3.org/TR/css-backgrounds-3/#border-style)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum BorderStyle {
    None,
    Hidden,
    Dotted,
    Dashed,
    /// A declared width draws a solid line unless a style says otherwise.
    #[default]
    Solid,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyle {
    /// `none` and `hidden` suppress the border entirely.
    #[must_use]
    pub const fn suppresses_border(self) -> bool {
        matches!(self, Self::None | Self::Hidden)
    }
}

/// [§ 3 list-style-type](https://www.w3.org/TR/css-lists-3/#text-markers)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListStyleType {
    /// "•"
    #[default]
    Disc,
    /// "◦"
    Circle,
    /// "□"
    Square,
    /// "1." "2." "3."
    Decimal,
    /// "a." "b." "c."
    LowerAlpha,
    /// "A." "B." "C."
    UpperAlpha,
    /// "i." "ii." "iii."
    LowerRoman,
    /// "I." "II." "III."
    UpperRoman,
    /// A literal marker string, from a quoted value.
    Literal(String),
    /// No marker.
    None,
}

impl ListStyleType {
    /// Parse a `list-style-type` value; `None` for unsupported keywords.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(literal) = strip_quotes(value) {
            return Some(Self::Literal(literal.to_string()));
        }
        let parsed = match value.to_ascii_lowercase().as_str() {
            "disc" => Self::Disc,
            "circle" => Self::Circle,
            "square" => Self::Square,
            "decimal" => Self::Decimal,
            "lower-alpha" | "lower-latin" => Self::LowerAlpha,
            "upper-alpha" | "upper-latin" => Self::UpperAlpha,
            "lower-roman" => Self::LowerRoman,
            "upper-roman" => Self::UpperRoman,
            "none" => Self::None,
            _ => return None,
        };
        Some(parsed)
    }
}

/// [§ 10.8 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
///
/// Unitless values are inherited as factors and scale with the font size of
/// each descendant; lengths are inherited as absolute values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineHeight {
    /// [`NORMAL_LINE_HEIGHT`] times the font size.
    #[default]
    Normal,
    /// A factor of the font size.
    Factor(f32),
    /// An absolute height in points.
    Absolute(f32),
}

impl LineHeight {
    /// The used line height for a font size.
    #[must_use]
    pub fn used(self, font_size: f32) -> f32 {
        match self {
            Self::Normal => font_size * NORMAL_LINE_HEIGHT,
            Self::Factor(f) => font_size * f,
            Self::Absolute(pt) => pt,
        }
    }
}

/// A paragraph indent with a row count, following the TeX `\hangafter`
/// convention: a negative `rows` indents the first `|rows|` lines, a
/// positive `rows` indents every line after the first `rows` lines, and
/// zero indents nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Indent {
    /// Indent amount in points.
    pub amount: f32,
    /// Row selector, see the type docs.
    pub rows: i32,
}

impl Indent {
    /// Indent the first `lines` lines by `amount` points.
    #[must_use]
    pub fn first_lines(amount: f32, lines: u16) -> Self {
        Self {
            amount,
            rows: -i32::from(lines),
        }
    }

    /// True if line `index` (zero-based) is indented.
    #[must_use]
    pub fn applies_to(self, index: usize) -> bool {
        if self.amount == 0.0 {
            return false;
        }
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        let rows = i64::from(self.rows);
        match rows.signum() {
            -1 => index < -rows,
            1 => index >= rows,
            _ => false,
        }
    }
}

/// The resolved style of one element.
///
/// Inherited fields are copied from the parent by [`StyleFrame::inherit`];
/// box-model fields (margins, borders, padding, radii, background, width,
/// display) start from their initial values on every element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleFrame {
    /// `font-family`, as written (a comma-separated list).
    pub font_family: String,
    /// Font size in points.
    pub font_size: f32,
    /// Numeric font weight (400 = normal, 700 = bold).
    pub font_weight: u16,
    /// Font style.
    pub font_style: FontStyle,
    /// OpenType feature settings (`liga 0`, `+smcp`).
    pub font_features: Vec<String>,
    /// Font expansion factor used by the paragraph formatter (1.0 = none).
    pub font_expansion: f32,
    /// Text color.
    pub color: ColorValue,
    /// Background color, if any.
    pub background_color: Option<ColorValue>,
    /// Margins in points.
    pub margin: EdgeSizes,
    /// Padding in points.
    pub padding: EdgeSizes,
    /// Border widths in points.
    pub border_widths: EdgeSizes,
    /// Border colors; `None` follows the text color.
    pub border_colors: Sides<Option<ColorValue>>,
    /// Border styles.
    pub border_styles: Sides<BorderStyle>,
    /// Corner radii in points.
    pub radii: Corners,
    /// Horizontal alignment.
    pub text_align: TextAlign,
    /// Vertical alignment (cells, margin boxes).
    pub vertical_align: VerticalAlign,
    /// Line height.
    pub line_height: LineHeight,
    /// First-line indent.
    pub text_indent: Indent,
    /// Marker style for list items.
    pub list_style_type: ListStyleType,
    /// Ordinal of the last list item seen in the list this frame belongs to.
    pub list_counter: u32,
    /// Tab width in spaces.
    pub tab_size: u32,
    /// `white-space: pre` and friends.
    pub preserve_whitespace: bool,
    /// `display: none`.
    pub hidden: bool,
    /// Whether punctuation may hang into the margin.
    pub hanging_punctuation: bool,
    /// `width`, unresolved (percentages need the available width).
    pub width: Option<String>,
    /// `height`, unresolved (used by images).
    pub height: Option<String>,
    /// `content`, unresolved (used by margin boxes).
    pub content: Option<String>,
}

impl Default for StyleFrame {
    /// The zero frame: nothing inherited, no font size.
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: 0.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
            font_features: Vec::new(),
            font_expansion: 1.0,
            color: ColorValue::BLACK,
            background_color: None,
            margin: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            border_widths: EdgeSizes::default(),
            border_colors: Sides::uniform(None),
            border_styles: Sides::uniform(BorderStyle::Solid),
            radii: Corners::default(),
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            line_height: LineHeight::Normal,
            text_indent: Indent::default(),
            list_style_type: ListStyleType::Disc,
            list_counter: 0,
            tab_size: 8,
            preserve_whitespace: false,
            hidden: false,
            hanging_punctuation: false,
            width: None,
            height: None,
            content: None,
        }
    }
}

impl StyleFrame {
    /// A document base frame with a font family and size.
    #[must_use]
    pub fn base(font_family: &str, font_size: f32) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            ..Self::default()
        }
    }

    /// [CSS Cascading § 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Clone this frame for a child element, resetting the properties CSS
    /// does not inherit.
    #[must_use]
    pub fn inherit(&self) -> Self {
        let initial = Self::default();
        Self {
            background_color: initial.background_color,
            margin: initial.margin,
            padding: initial.padding,
            border_widths: initial.border_widths,
            border_colors: initial.border_colors,
            border_styles: initial.border_styles,
            radii: initial.radii,
            hidden: initial.hidden,
            width: initial.width,
            height: initial.height,
            content: initial.content,
            ..self.clone()
        }
    }

    /// The used line height for this frame's font size.
    #[must_use]
    pub fn used_line_height(&self) -> f32 {
        self.line_height.used(self.font_size)
    }

    /// The color of one border side.
    #[must_use]
    pub fn border_color(&self, side: Side) -> ColorValue {
        self.border_colors.get(side).unwrap_or(self.color)
    }

    /// Apply an element's declarations to this frame.
    ///
    /// `font-size` is resolved first, against the inherited size, so that
    /// `em` and `%` values of every other declaration see the element's own
    /// font size. A later `font-size` replaces an earlier one; it does not
    /// compound with it. The rest is applied in source order. Finally a side whose
    /// border style is `none` or `hidden` loses its width, whatever width
    /// was declared.
    ///
    /// # Errors
    ///
    /// [`LayoutError::MalformedValue`] if a numeric value does not parse.
    pub fn apply(
        &mut self,
        declarations: &[StyleDeclaration],
        tag: &str,
        root: Option<f32>,
    ) -> Result<(), LayoutError> {
        let inherited = self.font_size;
        for decl in declarations
            .iter()
            .filter(|d| d.property == Property::FontSize)
        {
            self.font_size = resolve(&decl.value, inherited, root)
                .map_err(|err| LayoutError::from_value(err, tag, decl.property.as_ref()))?;
        }

        for decl in declarations
            .iter()
            .filter(|d| d.property != Property::FontSize)
        {
            self.apply_one(decl, root)
                .map_err(|err| LayoutError::from_value(err, tag, decl.property.as_ref()))?;
        }

        for side in Side::ALL {
            if self.border_styles.get(side).suppresses_border() {
                *self.border_widths.side_mut(side) = 0.0;
            }
        }
        Ok(())
    }

    fn apply_one(&mut self, decl: &StyleDeclaration, root: Option<f32>) -> Result<(), ValueError> {
        let value = decl.value.trim();
        let size = self.font_size;
        match decl.property {
            Property::FontSize => {}
            Property::FontFamily => self.font_family = value.to_string(),
            Property::FontWeight => self.font_weight = resolve_font_weight(value, self.font_weight),
            Property::FontStyle => set_keyword(&mut self.font_style, decl),
            Property::FontFeatureSettings => {
                self.font_features = if value.eq_ignore_ascii_case("normal") {
                    Vec::new()
                } else {
                    value
                        .split(',')
                        .map(|f| f.replace(['"', '\''], "").trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect()
                };
            }
            Property::FontExpansion => self.font_expansion = parse_factor(value)?,
            Property::Color => match ColorValue::parse(value) {
                Some(color) => self.color = color,
                None => unsupported(decl),
            },
            Property::BackgroundColor => match ColorValue::parse(value) {
                Some(color) if color.is_transparent() => self.background_color = None,
                Some(color) => self.background_color = Some(color),
                None => unsupported(decl),
            },
            Property::MarginTop => self.margin.top = margin(value, size, root)?,
            Property::MarginRight => self.margin.right = margin(value, size, root)?,
            Property::MarginBottom => self.margin.bottom = margin(value, size, root)?,
            Property::MarginLeft => self.margin.left = margin(value, size, root)?,
            Property::PaddingTop => self.padding.top = resolve(value, size, root)?,
            Property::PaddingRight => self.padding.right = resolve(value, size, root)?,
            Property::PaddingBottom => self.padding.bottom = resolve(value, size, root)?,
            Property::PaddingLeft => self.padding.left = resolve(value, size, root)?,
            Property::BorderTopWidth => {
                self.border_widths.top = resolve_border_width(value, size, root)?;
            }
            Property::BorderRightWidth => {
                self.border_widths.right = resolve_border_width(value, size, root)?;
            }
            Property::BorderBottomWidth => {
                self.border_widths.bottom = resolve_border_width(value, size, root)?;
            }
            Property::BorderLeftWidth => {
                self.border_widths.left = resolve_border_width(value, size, root)?;
            }
            Property::BorderTopStyle => set_keyword(&mut self.border_styles.top, decl),
            Property::BorderRightStyle => set_keyword(&mut self.border_styles.right, decl),
            Property::BorderBottomStyle => set_keyword(&mut self.border_styles.bottom, decl),
            Property::BorderLeftStyle => set_keyword(&mut self.border_styles.left, decl),
            Property::BorderTopColor => self.set_border_color(Side::Top, decl),
            Property::BorderRightColor => self.set_border_color(Side::Right, decl),
            Property::BorderBottomColor => self.set_border_color(Side::Bottom, decl),
            Property::BorderLeftColor => self.set_border_color(Side::Left, decl),
            Property::BorderTopLeftRadius => self.radii.top_left = radius(value, size, root)?,
            Property::BorderTopRightRadius => self.radii.top_right = radius(value, size, root)?,
            Property::BorderBottomRightRadius => {
                self.radii.bottom_right = radius(value, size, root)?;
            }
            Property::BorderBottomLeftRadius => {
                self.radii.bottom_left = radius(value, size, root)?;
            }
            Property::TextAlign => set_keyword(&mut self.text_align, decl),
            Property::VerticalAlign => set_keyword(&mut self.vertical_align, decl),
            Property::LineHeight => self.line_height = parse_line_height(value, size, root)?,
            Property::TextIndent => {
                self.text_indent = Indent::first_lines(resolve(value, size, root)?, 1);
            }
            Property::ListStyleType => match ListStyleType::parse(value) {
                Some(kind) => self.list_style_type = kind,
                None => unsupported(decl),
            },
            Property::TabSize => match value.parse::<u32>() {
                Ok(n) => self.tab_size = n,
                Err(_) => unsupported(decl),
            },
            // [§ 3 white-space](https://www.w3.org/TR/css-text-3/#white-space-property)
            Property::WhiteSpace => match value.to_ascii_lowercase().as_str() {
                "pre" | "pre-wrap" | "break-spaces" => self.preserve_whitespace = true,
                "normal" | "nowrap" | "pre-line" => self.preserve_whitespace = false,
                _ => unsupported(decl),
            },
            Property::Display => self.hidden = value.eq_ignore_ascii_case("none"),
            Property::HangingPunctuation => {
                self.hanging_punctuation = !value.eq_ignore_ascii_case("none");
            }
            Property::Width => self.width = non_auto(value),
            Property::Height => self.height = non_auto(value),
            Property::Content => self.content = Some(value.to_string()),
        }
        Ok(())
    }

    fn set_border_color(&mut self, side: Side, decl: &StyleDeclaration) {
        match ColorValue::parse(&decl.value) {
            Some(color) => *self.border_colors.side_mut(side) = Some(color),
            None => unsupported(decl),
        }
    }
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// "bolder / lighter: Specifies a bolder (lighter) weight than the inherited
/// value." The relative table follows § 3.2.1.
#[must_use]
pub fn resolve_font_weight(value: &str, inherited: u16) -> u16 {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => 400,
        "bold" => 700,
        "bolder" => match inherited {
            0..350 => 400,
            350..550 => 700,
            _ => 900,
        },
        "lighter" => match inherited {
            0..550 => 100,
            550..750 => 400,
            _ => 700,
        },
        other => match other.parse::<u16>() {
            Ok(n) if (1..=1000).contains(&n) => n,
            _ => {
                warn_once("css", &format!("unsupported font-weight '{value}'"));
                inherited
            }
        },
    }
}

fn parse_line_height(value: &str, size: f32, root: Option<f32>) -> Result<LineHeight, ValueError> {
    if value.eq_ignore_ascii_case("normal") {
        return Ok(LineHeight::Normal);
    }
    if let Ok(factor) = value.parse::<f32>() {
        return Ok(LineHeight::Factor(factor));
    }
    length::resolve_line_height(value, size, root).map(LineHeight::Absolute)
}

/// `auto` margins are treated as zero; there is no centering.
fn margin(value: &str, size: f32, root: Option<f32>) -> Result<f32, ValueError> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(0.0);
    }
    resolve(value, size, root)
}

/// Only the first (horizontal) radius of an elliptical pair is kept.
fn radius(value: &str, size: f32, root: Option<f32>) -> Result<f32, ValueError> {
    let parts = split_components(value);
    parts
        .first()
        .map_or(Ok(0.0), |first| resolve(first, size, root))
}

fn non_auto(value: &str) -> Option<String> {
    (!value.eq_ignore_ascii_case("auto")).then(|| value.to_string())
}

fn set_keyword<T: FromStr>(slot: &mut T, decl: &StyleDeclaration) {
    match T::from_str(decl.value.trim()) {
        Ok(parsed) => *slot = parsed,
        Err(_) => unsupported(decl),
    }
}

fn unsupported(decl: &StyleDeclaration) {
    warn_once(
        "css",
        &format!("ignoring unsupported value '{}' for '{}'", decl.value, decl.property),
    );
}

/// Strip one pair of matching quotes.
pub(crate) fn strip_quotes(value: &str) -> Option<&str> {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
}
