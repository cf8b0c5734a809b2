//! Supported properties and shorthand expansion.
//!
//! Declarations arrive as strings. They are parsed into [`Property`] once,
//! while the flow tree is built, so the assembler matches on a closed set of
//! variants instead of re-reading names. Unknown names are logged and
//! dropped at that point.

use std::str::FromStr;

use quire_common::warning::warn_once;
use quire_dom::Declaration;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// A longhand property understood by the style frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Property {
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    FontFeatureSettings,
    FontExpansion,
    Color,
    BackgroundColor,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderTopStyle,
    BorderRightStyle,
    BorderBottomStyle,
    BorderLeftStyle,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,
    TextAlign,
    VerticalAlign,
    LineHeight,
    TextIndent,
    ListStyleType,
    TabSize,
    WhiteSpace,
    Display,
    HangingPunctuation,
    Width,
    Height,
    Content,
}

/// A declaration whose property has been recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleDeclaration {
    /// The longhand property.
    pub property: Property,
    /// Raw value text.
    pub value: String,
}

impl StyleDeclaration {
    /// Create a declaration from an already-known property.
    pub fn new(property: Property, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];
const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

/// [§ 6.5 Border Style](https://www.w3.org/TR/css-backgrounds-3/#border-style)
const BORDER_STYLES: [&str; 10] = [
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Expand shorthands and parse property names, in source order.
///
/// Unknown properties are reported once through the warning system and
/// skipped; they never abort layout.
pub fn parse_declarations(declarations: &[Declaration]) -> Vec<StyleDeclaration> {
    let mut out = Vec::new();
    for decl in declarations {
        for (name, value) in expand_shorthand(&decl.name, &decl.value) {
            match Property::from_str(&name) {
                Ok(property) => out.push(StyleDeclaration::new(property, value)),
                Err(_) => warn_once("css", &format!("ignoring unknown property '{name}'")),
            }
        }
    }
    out
}

/// Split a shorthand into longhand `(name, value)` pairs.
///
/// Longhands (and unknown names) are passed through unchanged.
#[must_use]
pub fn expand_shorthand(name: &str, value: &str) -> Vec<(String, String)> {
    let parts = split_components(value);
    match name {
        // [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        // "If there is only one component value, it applies to all sides. If
        // there are two values, the top and bottom margins are set to the
        // first value and the right and left margins are set to the second.
        // If there are three values, the top is set to the first value, the
        // left and right are set to the second, and the bottom is set to the
        // third. If there are four values, they apply to the top, right,
        // bottom, and left, respectively."
        "margin" | "padding" => four_sides(&parts)
            .into_iter()
            .zip(SIDES)
            .map(|(v, side)| (format!("{name}-{side}"), v))
            .collect(),
        "border-width" | "border-style" | "border-color" => {
            let suffix = &name["border-".len()..];
            four_sides(&parts)
                .into_iter()
                .zip(SIDES)
                .map(|(v, side)| (format!("border-{side}-{suffix}"), v))
                .collect()
        }
        // [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
        // Only the horizontal radii are kept; anything after a '/' is dropped.
        "border-radius" => {
            let horizontal: Vec<String> = parts.iter().take_while(|p| *p != "/").cloned().collect();
            four_sides(&horizontal)
                .into_iter()
                .zip(CORNERS)
                .map(|(v, corner)| (format!("border-{corner}-radius"), v))
                .collect()
        }
        "border" => SIDES
            .iter()
            .flat_map(|side| border_side(side, &parts))
            .collect(),
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            border_side(&name["border-".len()..], &parts)
        }
        // Only the color layer of the background is supported.
        "background" => parts
            .iter()
            .find(|p| crate::ColorValue::parse(p).is_some())
            .map(|color| vec![("background-color".to_string(), color.clone())])
            .unwrap_or_default(),
        "list-style" => parts
            .iter()
            .find(|p| !p.eq_ignore_ascii_case("inside") && !p.eq_ignore_ascii_case("outside"))
            .map(|t| vec![("list-style-type".to_string(), t.clone())])
            .unwrap_or_default(),
        _ => vec![(name.to_string(), value.trim().to_string())],
    }
}

/// `border-<side>: <width> || <style> || <color>`, in any order.
fn border_side(side: &str, parts: &[String]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for part in parts {
        let lower = part.to_ascii_lowercase();
        let kind = if BORDER_STYLES.contains(&lower.as_str()) {
            "style"
        } else if matches!(lower.as_str(), "thin" | "medium" | "thick")
            || lower.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        {
            "width"
        } else {
            "color"
        };
        out.push((format!("border-{side}-{kind}"), part.clone()));
    }
    out
}

/// Apply the one-to-four value rule. Returns values for top, right, bottom, left.
fn four_sides(parts: &[String]) -> Vec<String> {
    match parts {
        [all] => vec![all.clone(); 4],
        [vertical, horizontal] => vec![
            vertical.clone(),
            horizontal.clone(),
            vertical.clone(),
            horizontal.clone(),
        ],
        [top, horizontal, bottom] => vec![
            top.clone(),
            horizontal.clone(),
            bottom.clone(),
            horizontal.clone(),
        ],
        [top, right, bottom, left, ..] => {
            vec![top.clone(), right.clone(), bottom.clone(), left.clone()]
        }
        [] => Vec::new(),
    }
}

/// Split a value on whitespace, keeping parenthesized groups and quoted
/// strings together (`1px solid rgb(0, 0, 0)` has three components).
#[must_use]
pub fn split_components(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in value.trim().chars() {
        match c {
            '"' | '\'' if quote.is_none() => quote = Some(c),
            c if Some(c) == quote => quote = None,
            '(' if quote.is_none() => depth += 1,
            ')' if quote.is_none() => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 && quote.is_none() {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
