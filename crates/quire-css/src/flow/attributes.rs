//! Attribute resolution.
//!
//! [WHATWG HTML § 15.3 Non-replaced elements](https://html.spec.whatwg.org/multipage/rendering.html#non-replaced-elements)
//!
//! An element's effective declarations come from three places, applied in
//! this order so that later ones win:
//!
//! 1. presentational hints for the tag (bold for `b`, monospace for `code`)
//! 2. the cascaded declarations supplied with the tree
//! 3. the `style` attribute
//!
//! The bare HTML `width` attribute becomes a `width` declaration only when
//! none of the above sets one.

use std::collections::HashMap;

use quire_dom::{Declaration, ElementData};

use crate::style::{Property, StyleDeclaration, parse_declarations};

/// Default declarations implied by a tag.
///
/// Block spacing (paragraph and heading margins) is left to the supplied
/// cascade; only font and visibility hints live here.
#[must_use]
pub fn presentational_hints(tag: &str) -> Vec<Declaration> {
    let hints: &[(&str, &str)] = match tag {
        "b" | "strong" | "th" => &[("font-weight", "bold")],
        "i" | "em" | "cite" | "var" | "dfn" => &[("font-style", "italic")],
        "code" | "kbd" | "samp" | "tt" => &[("font-family", "monospace")],
        "pre" => &[("font-family", "monospace"), ("white-space", "pre")],
        "big" => &[("font-size", "larger")],
        "small" => &[("font-size", "smaller")],
        "ol" => &[("list-style-type", "decimal")],
        "head" | "title" | "style" | "script" | "meta" | "link" | "template" => {
            &[("display", "none")]
        }
        _ => &[],
    };
    hints
        .iter()
        .map(|(name, value)| Declaration::new(name, value))
        .collect()
}

/// Split an element into its attribute map and typed declarations.
#[must_use]
pub fn resolve_attributes(element: &ElementData) -> (HashMap<String, String>, Vec<StyleDeclaration>) {
    let mut raw = presentational_hints(&element.tag_name);
    raw.extend(element.declarations.iter().cloned());

    let mut attributes = HashMap::new();
    for (name, value) in &element.attrs {
        if name == "style" {
            continue;
        }
        let _ = attributes.insert(name.clone(), value.clone());
    }
    if let Some(style) = element.attrs.get("style") {
        raw.extend(Declaration::parse_block(style));
    }

    let mut declarations = parse_declarations(&raw);

    // [§ 15.4.3 Attributes for embedded content and images](https://html.spec.whatwg.org/multipage/rendering.html#attributes-for-embedded-content-and-images)
    // "The width and height attributes map to the dimension properties."
    for (property, attribute) in [(Property::Width, "width"), (Property::Height, "height")] {
        if declarations.iter().any(|d| d.property == property) {
            continue;
        }
        if let Some(value) = attributes.get(attribute) {
            declarations.push(StyleDeclaration::new(property, pixels(value)));
        }
    }

    (attributes, declarations)
}

/// HTML dimension attributes are in CSS pixels when unitless.
fn pixels(value: &str) -> String {
    let value = value.trim();
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{value}px")
    } else {
        value.to_string()
    }
}
