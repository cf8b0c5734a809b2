//! List item markers.
//!
//! [CSS Lists § 3 Markers](https://www.w3.org/TR/css-lists-3/#markers)

use crate::style::ListStyleType;

/// [CSS Counter Styles § 6 Simple Predefined Counter Styles](https://www.w3.org/TR/css-counter-styles-3/#simple-numeric)
///
/// The marker text for item number `ordinal` (1-based). `None` means no
/// marker at all.
#[must_use]
pub fn marker_text(style: &ListStyleType, ordinal: u32) -> Option<String> {
    let text = match style {
        ListStyleType::None => return None,
        ListStyleType::Disc => "•".to_string(),
        ListStyleType::Circle => "◦".to_string(),
        ListStyleType::Square => "□".to_string(),
        ListStyleType::Decimal => format!("{ordinal}."),
        ListStyleType::LowerAlpha => format!("{}.", alphabetic(ordinal)),
        ListStyleType::UpperAlpha => format!("{}.", alphabetic(ordinal).to_ascii_uppercase()),
        ListStyleType::LowerRoman => format!("{}.", roman(ordinal)),
        ListStyleType::UpperRoman => format!("{}.", roman(ordinal).to_ascii_uppercase()),
        ListStyleType::Literal(text) => text.clone(),
    };
    Some(text)
}

/// "alphabetic: a, b, ... z, aa, ab, ..." Zero falls back to decimal.
fn alphabetic(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// "lower-roman: i, ii, iii, iv, ..." defined for 1 to 3999; other values
/// fall back to decimal.
fn roman(n: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    if !(1..4000).contains(&n) {
        return n.to_string();
    }
    let mut rest = n;
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while rest >= value {
            out.push_str(numeral);
            rest -= value;
        }
    }
    out
}
