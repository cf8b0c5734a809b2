//! Integration tests for value resolution, colors and declarations.

use quickcheck_macros::quickcheck;
use quire_common::warning::was_warned;
use quire_css::ValueError;
use quire_css::style::length::{PT_PER_CM, resolve, resolve_border_width, resolve_width};
use quire_css::style::{
    BorderStyle, ColorValue, Property, StyleDeclaration, StyleFrame, expand_shorthand,
};
use quire_dom::Declaration;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.001
}

#[test]
fn test_relative_units() {
    assert!(close(resolve("1em", 10.0, None).unwrap(), 10.0));
    assert!(close(resolve("1.5em", 12.0, None).unwrap(), 18.0));
    assert!(close(resolve("50%", 12.0, None).unwrap(), 6.0));
    assert!(close(resolve("2rem", 10.0, Some(12.0)).unwrap(), 24.0));
    assert!(close(resolve("1.5", 10.0, None).unwrap(), 15.0));
}

#[test]
fn test_rem_without_root_is_zero() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert!(close(resolve("2rem", 10.0, None).unwrap(), 0.0));
}

#[test]
fn test_em_without_font_size_is_zero() {
    assert!(close(resolve("3em", 0.0, Some(10.0)).unwrap(), 0.0));
}

#[test]
fn test_absolute_units() {
    assert!(close(resolve("12pt", 10.0, None).unwrap(), 12.0));
    assert!(close(resolve("12px", 10.0, None).unwrap(), 9.0));
    assert!(close(resolve("1in", 10.0, None).unwrap(), 72.0));
    assert!(close(resolve("1cm", 10.0, None).unwrap(), PT_PER_CM));
    assert!(close(resolve("10mm", 10.0, None).unwrap(), PT_PER_CM));
    assert!(close(resolve("2pc", 10.0, None).unwrap(), 24.0));
    assert!(close(resolve("40q", 10.0, None).unwrap(), PT_PER_CM));
    assert!(close(resolve(" 3PT ", 10.0, None).unwrap(), 3.0));
}

#[test]
fn test_size_keywords() {
    assert!(close(resolve("medium", 14.0, None).unwrap(), 10.0));
    assert!(close(resolve("large", 14.0, None).unwrap(), 12.0));
    assert!(close(resolve("xx-large", 14.0, None).unwrap(), 20.0));
    assert!(close(resolve("larger", 10.0, None).unwrap(), 12.0));
    assert!(close(resolve("smaller", 10.0, None).unwrap(), 8.0));
}

#[test]
fn test_unknown_keyword_keeps_current() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert!(close(resolve("inherit-ish", 11.0, None).unwrap(), 11.0));
    // `thin` ends in `in` but is not a length.
    assert!(close(resolve("thin", 11.0, None).unwrap(), 11.0));
}

#[test]
fn test_malformed_number_is_an_error() {
    assert_eq!(
        resolve("1.2.3pt", 10.0, None),
        Err(ValueError::Malformed {
            value: "1.2.3pt".to_string()
        })
    );
    assert!(resolve("--4em", 10.0, None).is_err());
}

#[test]
fn test_border_width_keywords() {
    assert!(close(resolve_border_width("thin", 10.0, None).unwrap(), 0.75));
    assert!(close(resolve_border_width("thick", 10.0, None).unwrap(), 3.75));
    assert!(close(resolve_border_width("2pt", 10.0, None).unwrap(), 2.0));
}

#[test]
fn test_width_percentages_refer_to_available_width() {
    assert_eq!(resolve_width("auto", 300.0, 10.0, None).unwrap(), None);
    assert!(close(
        resolve_width("50%", 300.0, 10.0, None).unwrap().unwrap(),
        150.0
    ));
    assert!(close(
        resolve_width("10em", 300.0, 12.0, None).unwrap().unwrap(),
        120.0
    ));
}

#[quickcheck]
fn prop_em_resolution_is_deterministic(factor: u16, current: u8) -> bool {
    let value = format!("{}em", f32::from(factor) / 10.0);
    let current = f32::from(current);
    resolve(&value, current, None) == resolve(&value, current, None)
}

#[quickcheck]
fn prop_percent_and_rem_are_idempotent(percent: u16, current: u8, root: u8) -> bool {
    let current = f32::from(current);
    let root = Some(f32::from(root));
    let pct = format!("{percent}%");
    let rem = format!("{}rem", f32::from(percent) / 100.0);
    let first = (resolve(&pct, current, root), resolve(&rem, current, root));
    let second = (resolve(&pct, current, root), resolve(&rem, current, root));
    first == second && first.0.is_ok() && first.1.is_ok()
}

#[test]
fn test_colors() {
    assert_eq!(ColorValue::parse("#fff"), Some(ColorValue::WHITE));
    assert_eq!(ColorValue::parse("#000000"), Some(ColorValue::BLACK));
    assert_eq!(ColorValue::parse("red"), Some(ColorValue::rgb(255, 0, 0)));
    assert_eq!(
        ColorValue::parse("rgb(10, 20, 30)"),
        Some(ColorValue::rgb(10, 20, 30))
    );
    assert_eq!(ColorValue::parse("not-a-color"), None);
}

#[test]
fn test_shorthand_expansion() {
    assert_eq!(
        expand_shorthand("margin", "1pt 2pt"),
        vec![
            ("margin-top".to_string(), "1pt".to_string()),
            ("margin-right".to_string(), "2pt".to_string()),
            ("margin-bottom".to_string(), "1pt".to_string()),
            ("margin-left".to_string(), "2pt".to_string()),
        ]
    );
    assert_eq!(
        expand_shorthand("color", "red"),
        vec![("color".to_string(), "red".to_string())]
    );
}

#[test]
fn test_unknown_properties_are_dropped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let decls = quire_css::style::parse_declarations(&[
        Declaration::new("frobnicate", "yes"),
        Declaration::new("font-size", "12pt"),
    ]);
    assert_eq!(decls, vec![StyleDeclaration::new(Property::FontSize, "12pt")]);
    assert!(was_warned("css", "ignoring unknown property 'frobnicate'"));
}

#[test]
fn test_font_size_resolves_before_other_properties() {
    let mut frame = StyleFrame::base("serif", 10.0);
    frame
        .apply(
            &[
                StyleDeclaration::new(Property::MarginTop, "1em"),
                StyleDeclaration::new(Property::FontSize, "20pt"),
            ],
            "p",
            None,
        )
        .unwrap();
    assert!(close(frame.font_size, 20.0));
    assert!(close(frame.margin.top, 20.0));
}

#[test]
fn test_later_font_size_replaces_earlier_hint() {
    let mut frame = StyleFrame::base("serif", 10.0);
    frame
        .apply(
            &[
                StyleDeclaration::new(Property::FontSize, "larger"),
                StyleDeclaration::new(Property::FontSize, "2em"),
            ],
            "big",
            None,
        )
        .unwrap();
    assert!(close(frame.font_size, 20.0));

    let mut frame = StyleFrame::base("serif", 10.0);
    frame
        .apply(
            &[
                StyleDeclaration::new(Property::FontSize, "smaller"),
                StyleDeclaration::new(Property::FontSize, "80%"),
            ],
            "small",
            None,
        )
        .unwrap();
    assert!(close(frame.font_size, 8.0));
}

#[test]
fn test_border_style_none_zeroes_width() {
    let mut frame = StyleFrame::base("serif", 10.0);
    frame
        .apply(
            &[
                StyleDeclaration::new(Property::BorderTopWidth, "2pt"),
                StyleDeclaration::new(Property::BorderTopStyle, "none"),
                StyleDeclaration::new(Property::BorderBottomWidth, "2pt"),
            ],
            "td",
            None,
        )
        .unwrap();
    assert_eq!(frame.border_styles.top, BorderStyle::None);
    assert!(close(frame.border_widths.top, 0.0));
    assert!(close(frame.border_widths.bottom, 2.0));
}

#[test]
fn test_malformed_declaration_names_tag_and_property() {
    let mut frame = StyleFrame::base("serif", 10.0);
    let err = frame
        .apply(
            &[StyleDeclaration::new(Property::PaddingLeft, "1..5pt")],
            "div",
            None,
        )
        .unwrap_err();
    assert_eq!(
        err,
        quire_css::LayoutError::MalformedValue {
            tag: "div".to_string(),
            property: "padding-left".to_string(),
            value: "1..5pt".to_string(),
        }
    );
}
