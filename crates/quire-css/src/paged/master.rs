//! Page masters: resolved page geometry per page selector.
//!
//! [CSS Paged Media § 3.2 Page Models](https://www.w3.org/TR/css-page-3/#page-model)
//!
//! "The page area is the content area of the page box." A master is the
//! page size, margins, page box decoration, page area and the margin areas
//! that have content, resolved once per selector and reused for every page
//! that selector picks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::str::FromStr;

use log::debug;
use quire_common::warning::warn_once;
use serde::Serialize;

use super::margin_box::{MarginArea, MarginBoxSpec, has_contents};
use super::paper::PageSize;
use super::rule::{PageRule, PageSelector, declarations};
use crate::error::LayoutError;
use crate::layout::{Decoration, EdgeSizes, LayoutContext, Rect};
use crate::style::length::PT_PER_CM;
use crate::style::resolve_width;

/// The resolved geometry of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMaster {
    /// The selector this master was resolved for.
    pub selector: PageSelector,
    /// Sheet size.
    pub size: PageSize,
    /// Page margins.
    pub margin: EdgeSizes,
    /// Border, padding and background of the page box. Margins are zero.
    pub decoration: Decoration,
    /// Where content goes: the page minus margins, border and padding.
    pub content: Rect,
    /// Margin areas with content, in painting order.
    #[serde(skip)]
    pub areas: Vec<MarginBoxSpec>,
}

impl PageMaster {
    /// Resolve a (merged) page rule.
    ///
    /// Unset margins are 1cm. Percentage margins refer to the page width.
    ///
    /// # Errors
    ///
    /// [`LayoutError::MalformedValue`] for a size, margin or page box value
    /// that does not parse.
    pub fn resolve(rule: &PageRule, context: &LayoutContext) -> Result<Self, LayoutError> {
        let size = PageSize::parse(rule.size.as_deref().unwrap_or("auto"))
            .map_err(|err| LayoutError::from_value(err, "@page", "size"))?;

        let root = context.root_font_size;
        let margin_value = |value: Option<&str>, property: &str| {
            value.map_or(Ok(PT_PER_CM), |v| {
                resolve_width(v, size.width, context.font_size, root)
                    .map(|w| w.unwrap_or(PT_PER_CM))
                    .map_err(|err| LayoutError::from_value(err, "@page", property))
            })
        };
        let margin = EdgeSizes {
            top: margin_value(rule.margin_top.as_deref(), "margin-top")?,
            right: margin_value(rule.margin_right.as_deref(), "margin-right")?,
            bottom: margin_value(rule.margin_bottom.as_deref(), "margin-bottom")?,
            left: margin_value(rule.margin_left.as_deref(), "margin-left")?,
        };

        let mut frame = context.base_frame();
        frame.apply(&declarations(&rule.properties), "@page", root)?;
        let decoration = Decoration {
            margin: EdgeSizes::default(),
            ..Decoration::from_frame(&frame)
        };

        let inset_left = margin.left + decoration.border.left + decoration.padding.left;
        let inset_top = margin.top + decoration.border.top + decoration.padding.top;
        let content = Rect::new(
            inset_left,
            inset_top,
            (size.width - margin.horizontal() - decoration.border.horizontal()
                - decoration.padding.horizontal())
            .max(0.0),
            (size.height - margin.vertical() - decoration.border.vertical()
                - decoration.padding.vertical())
            .max(0.0),
        );

        for name in rule.areas.keys() {
            if MarginArea::from_str(name).is_err() {
                warn_once("page", &format!("ignoring unknown margin area '{name}'"));
            }
        }
        let areas = MarginArea::PAINT_ORDER
            .iter()
            .filter_map(|area| {
                let properties = rule.areas.get(area.as_ref())?;
                let declarations = declarations(properties);
                has_contents(&declarations).then_some(MarginBoxSpec {
                    area: *area,
                    declarations,
                })
            })
            .collect();

        Ok(Self {
            selector: rule.selector,
            size,
            margin,
            decoration,
            content,
            areas,
        })
    }

    /// The page area: inside the margins, outside the page box border.
    #[must_use]
    pub fn page_area(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            (self.size.width - self.margin.horizontal()).max(0.0),
            (self.size.height - self.margin.vertical()).max(0.0),
        )
    }
}

/// Page rules by selector, and the masters resolved from them.
#[derive(Debug, Default)]
pub struct PageMasters {
    rules: HashMap<PageSelector, PageRule>,
    cache: HashMap<PageSelector, PageMaster>,
}

impl PageMasters {
    /// No rules: every page is a default A4 page with 1cm margins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. A second rule for the same selector is merged over the
    /// first.
    pub fn add_rule(&mut self, rule: PageRule) {
        let merged = match self.rules.get(&rule.selector) {
            Some(existing) => existing.merged_with(&rule),
            None => rule,
        };
        let _ = self.rules.insert(merged.selector, merged);
        self.cache.clear();
    }

    /// [§ 3.3 Page selectors](https://www.w3.org/TR/css-page-3/#page-selectors)
    ///
    /// The selector for the page after `pages_so_far` finished pages. The
    /// first page uses `:first` if there is one; otherwise an even count
    /// so far is a right page and an odd count a left page, when such a
    /// rule exists.
    #[must_use]
    pub fn select(&self, pages_so_far: usize) -> PageSelector {
        let candidates = [
            (pages_so_far == 0, PageSelector::First),
            (pages_so_far % 2 == 0, PageSelector::Right),
            (pages_so_far % 2 == 1, PageSelector::Left),
        ];
        candidates
            .into_iter()
            .find(|(applies, selector)| *applies && self.rules.contains_key(selector))
            .map_or(PageSelector::Default, |(_, selector)| selector)
    }

    /// The master for the page after `pages_so_far` finished pages.
    ///
    /// The selected rule is laid over the default rule, resolved, and
    /// cached for later pages with the same selector.
    ///
    /// # Errors
    ///
    /// See [`PageMaster::resolve`].
    pub fn master(
        &mut self,
        pages_so_far: usize,
        context: &LayoutContext,
    ) -> Result<&PageMaster, LayoutError> {
        let selector = self.select(pages_so_far);
        match self.cache.entry(selector) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let default = self.rules.get(&PageSelector::Default).cloned().unwrap_or_default();
                let rule = match self.rules.get(&selector) {
                    Some(selected) if selector != PageSelector::Default => {
                        default.merged_with(selected)
                    }
                    _ => default,
                };
                let master = PageMaster::resolve(&rule, context)?;
                debug!(
                    target: "quire::page",
                    "resolved :{selector} master {}x{}",
                    master.size.width,
                    master.size.height
                );
                Ok(entry.insert(master))
            }
        }
    }
}
