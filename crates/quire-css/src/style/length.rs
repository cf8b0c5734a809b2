//! CSS length resolution.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Every length is resolved eagerly to typographic points (1pt = 1/72in)
//! against the font size in effect and the root font size. There is no
//! computed-value stage: a frame stores points only.

use quire_common::warning::warn_once;

use crate::error::ValueError;

/// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
/// "1px = 1/96th of 1in"
pub const PT_PER_PX: f32 = 0.75;
/// "1in = 2.54cm = 96px"
pub const PT_PER_IN: f32 = 72.0;
/// "1cm = 96px/2.54"
pub const PT_PER_CM: f32 = PT_PER_IN / 2.54;
/// "1mm = 1/10th of 1cm"
pub const PT_PER_MM: f32 = PT_PER_CM / 10.0;
/// "1Q = 1/40th of 1cm"
pub const PT_PER_Q: f32 = PT_PER_CM / 40.0;
/// "1pc = 1/6th of 1in"
pub const PT_PER_PC: f32 = 12.0;

/// The size `medium` maps to, and the default document font size.
pub const MEDIUM_FONT_SIZE: f32 = 10.0;

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "We recommend a used value for 'normal' between 1.0 and 1.2."
pub const NORMAL_LINE_HEIGHT: f32 = 1.2;

/// [§ 2.5 Font size](https://www.w3.org/TR/css-fonts-4/#absolute-size-mapping)
///
/// Absolute-size keywords as ratios of `medium`.
const ABSOLUTE_SIZES: [(&str, f32); 8] = [
    ("xx-small", 3.0 / 5.0),
    ("x-small", 3.0 / 4.0),
    ("small", 8.0 / 9.0),
    ("medium", 1.0),
    ("large", 6.0 / 5.0),
    ("x-large", 3.0 / 2.0),
    ("xx-large", 2.0),
    ("xxx-large", 3.0),
];

/// Relative-size keyword step (`larger` / `smaller`).
const RELATIVE_STEP: f32 = 0.2;

/// Resolve a CSS size to points.
///
/// Forms are tried in this order:
///
/// 1. `N%` of `current`
/// 2. `Nrem` of `root` (zero with a warning when the root size is unknown)
/// 3. `Nem` of `current` (zero with a warning when `current` is zero)
/// 4. absolute units (`pt`, `px`, `in`, `cm`, `mm`, `q`, `pc`)
/// 5. a bare number, as a factor of `current`
/// 6. absolute-size keywords, `larger` and `smaller`
///
/// Anything else resolves to `current` and is logged.
///
/// # Errors
///
/// Returns [`ValueError::Malformed`] when a value has a numeric shape with
/// a unit suffix but the number itself does not parse.
pub fn resolve(value: &str, current: f32, root: Option<f32>) -> Result<f32, ValueError> {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();

    if let Some(number) = numeric_prefix(&lower, "%") {
        return Ok(parse_number(number, value)? / 100.0 * current);
    }

    // [§ 6.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    // "rem: Equal to the computed value of font-size on the root element."
    if let Some(number) = numeric_prefix(&lower, "rem") {
        let factor = parse_number(number, value)?;
        return Ok(root.map_or_else(
            || {
                warn_once(
                    "css",
                    &format!("'{value}' used before the root font size is known; using 0"),
                );
                0.0
            },
            |root| factor * root,
        ));
    }

    // "em: Equal to the computed value of the font-size property of the
    // element on which it is used."
    if let Some(number) = numeric_prefix(&lower, "em") {
        let factor = parse_number(number, value)?;
        if current == 0.0 {
            warn_once("css", &format!("'{value}' used without a font size; using 0"));
            return Ok(0.0);
        }
        return Ok(factor * current);
    }

    if let Some(points) = absolute_length(&lower, value)? {
        return Ok(points);
    }

    if looks_numeric(&lower) {
        return Ok(parse_number(&lower, value)? * current);
    }

    if let Some(size) = keyword_size(&lower, current) {
        return Ok(size);
    }

    warn_once(
        "css",
        &format!("unsupported size '{value}', keeping the current size"),
    );
    Ok(current)
}

/// Resolve a `line-height` value to points for a given font size.
///
/// `normal` is [`NORMAL_LINE_HEIGHT`] times the font size; bare numbers are
/// factors of the font size.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_line_height(
    value: &str,
    font_size: f32,
    root: Option<f32>,
) -> Result<f32, ValueError> {
    if value.trim().eq_ignore_ascii_case("normal") {
        return Ok(font_size * NORMAL_LINE_HEIGHT);
    }
    resolve(value, font_size, root)
}

/// [§ 4.3 Line width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
///
/// "thin: A thin border. medium: A medium border. thick: A thick border."
/// Mapped to 1px, 3px and 5px respectively.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_border_width(
    value: &str,
    font_size: f32,
    root: Option<f32>,
) -> Result<f32, ValueError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "thin" => Ok(PT_PER_PX),
        "medium" => Ok(3.0 * PT_PER_PX),
        "thick" => Ok(5.0 * PT_PER_PX),
        _ => resolve(value, font_size, root),
    }
}

/// Resolve a `width` against the available width.
///
/// Percentages refer to `available`; everything else goes through
/// [`resolve`] with the font size. `auto` yields `None`.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_width(
    value: &str,
    available: f32,
    font_size: f32,
    root: Option<f32>,
) -> Result<Option<f32>, ValueError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("auto") || trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.ends_with('%') {
        return resolve(trimmed, available, root).map(Some);
    }
    resolve(trimmed, font_size, root).map(Some)
}

/// Parse a plain or percentage factor (`1.5`, `150%`).
///
/// # Errors
///
/// Returns [`ValueError::Malformed`] if the number does not parse.
pub fn parse_factor(value: &str) -> Result<f32, ValueError> {
    let trimmed = value.trim();
    trimmed.strip_suffix('%').map_or_else(
        || parse_number(trimmed, value),
        |number| Ok(parse_number(number, value)? / 100.0),
    )
}

/// Absolute unit literals. `Ok(None)` means "not an absolute length".
fn absolute_length(lower: &str, original: &str) -> Result<Option<f32>, ValueError> {
    const UNITS: [(&str, f32); 7] = [
        ("pt", 1.0),
        ("px", PT_PER_PX),
        ("in", PT_PER_IN),
        ("cm", PT_PER_CM),
        ("mm", PT_PER_MM),
        ("pc", PT_PER_PC),
        ("q", PT_PER_Q),
    ];
    for (unit, factor) in UNITS {
        if let Some(number) = numeric_prefix(lower, unit) {
            return Ok(Some(parse_number(number, original)? * factor));
        }
    }
    Ok(None)
}

fn keyword_size(keyword: &str, current: f32) -> Option<f32> {
    match keyword {
        "larger" => Some(current * (1.0 + RELATIVE_STEP)),
        "smaller" => Some(current * (1.0 - RELATIVE_STEP)),
        _ => ABSOLUTE_SIZES
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, ratio)| ratio * MEDIUM_FONT_SIZE),
    }
}

/// Strip `suffix` when what remains has the shape of a number.
///
/// `thin` ends in `in` and `system` ends in `em`; neither is a length.
fn numeric_prefix<'a>(lower: &'a str, suffix: &str) -> Option<&'a str> {
    lower.strip_suffix(suffix).filter(|rest| looks_numeric(rest))
}

fn looks_numeric(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
}

fn parse_number(number: &str, original: &str) -> Result<f32, ValueError> {
    number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValueError::Malformed {
            value: original.to_string(),
        })
}
