//! `@page` rules as they arrive from the cascade.
//!
//! [CSS Paged Media § 3 Page selectors](https://www.w3.org/TR/css-page-3/#page-selectors)

use std::collections::BTreeMap;

use quire_dom::Declaration;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::style::{StyleDeclaration, parse_declarations};

/// Which pages a rule applies to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PageSelector {
    /// `@page` without a pseudo-class.
    #[default]
    Default,
    /// `@page :first`
    First,
    /// `@page :left`
    Left,
    /// `@page :right`
    Right,
}

/// A property map keyed by property name, values as written.
pub type PropertyMap = BTreeMap<String, String>;

/// One page rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageRule {
    /// Pages this rule selects.
    pub selector: PageSelector,
    /// The `size` value: a paper name, `landscape`/`portrait`, or lengths.
    pub size: Option<String>,
    /// `margin-top`
    pub margin_top: Option<String>,
    /// `margin-right`
    pub margin_right: Option<String>,
    /// `margin-bottom`
    pub margin_bottom: Option<String>,
    /// `margin-left`
    pub margin_left: Option<String>,
    /// Border, padding and background of the page box.
    pub properties: PropertyMap,
    /// [§ 5 Page-margin boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)
    ///
    /// Declarations per margin area, keyed by area name (`top-center`).
    pub areas: BTreeMap<String, PropertyMap>,
}

impl PageRule {
    /// An empty rule for `selector`.
    #[must_use]
    pub fn new(selector: PageSelector) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }

    /// This rule with `overrides` laid on top. Areas merge property by
    /// property.
    #[must_use]
    pub fn merged_with(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        merged.selector = overrides.selector;
        merged.size = overrides.size.clone().or(merged.size);
        merged.margin_top = overrides.margin_top.clone().or(merged.margin_top);
        merged.margin_right = overrides.margin_right.clone().or(merged.margin_right);
        merged.margin_bottom = overrides.margin_bottom.clone().or(merged.margin_bottom);
        merged.margin_left = overrides.margin_left.clone().or(merged.margin_left);
        merged.properties.extend(overrides.properties.clone());
        for (area, properties) in &overrides.areas {
            merged
                .areas
                .entry(area.clone())
                .or_default()
                .extend(properties.clone());
        }
        merged
    }
}

/// Turn a property map into typed declarations, expanding shorthands.
#[must_use]
pub fn declarations(properties: &PropertyMap) -> Vec<StyleDeclaration> {
    let raw: Vec<Declaration> = properties
        .iter()
        .map(|(name, value)| Declaration::new(name, value))
        .collect();
    parse_declarations(&raw)
}
