//! Flow classification.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Before layout, the element tree is copied once into an immutable tree of
//! [`FlowItem`]s. Every item is tagged with a [`FlowDirection`]: block-level
//! content stacks vertically, inline-level content runs horizontally.
//! Whitespace is normalized here, and every element's declarations are
//! parsed into typed [`StyleDeclaration`]s, so layout never looks at raw
//! strings again.

mod attributes;
mod classifier;

use std::collections::HashMap;

use serde::Serialize;

use crate::style::StyleDeclaration;

pub use attributes::{presentational_hints, resolve_attributes};
pub use classifier::{BLOCK_TAGS, INLINE_TAGS, classify, collapse_whitespace};

/// Whether an item stacks (vertical) or runs inline (horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowDirection {
    /// Inline flow.
    Horizontal,
    /// Block flow.
    Vertical,
}

/// Text or element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    /// A run of character data.
    Text,
    /// An element.
    Element,
}

/// A node of the classified tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowItem {
    /// Text or element.
    pub kind: FlowKind,
    /// Lowercase tag name; empty for text and for the anonymous root.
    pub tag: String,
    /// Normalized character data (text items only).
    pub text: String,
    /// Flow direction.
    pub dir: FlowDirection,
    /// HTML attributes other than `style`.
    pub attributes: HashMap<String, String>,
    /// Declarations in application order: presentational hints, cascaded
    /// declarations, then the `style` attribute.
    pub declarations: Vec<StyleDeclaration>,
    /// Children in document order.
    pub children: Vec<FlowItem>,
}

impl FlowItem {
    /// An element item with no attributes, declarations or children.
    #[must_use]
    pub fn element(tag: &str, dir: FlowDirection) -> Self {
        Self {
            kind: FlowKind::Element,
            tag: tag.to_string(),
            text: String::new(),
            dir,
            attributes: HashMap::new(),
            declarations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A text item. Text always runs horizontally.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            kind: FlowKind::Text,
            text: text.to_string(),
            ..Self::element("", FlowDirection::Horizontal)
        }
    }

    /// True for elements.
    #[must_use]
    pub fn is_element(&self) -> bool {
        self.kind == FlowKind::Element
    }

    /// True for elements that start block flow.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.is_element() && self.dir == FlowDirection::Vertical
    }

    /// Attribute lookup.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Element children with the given tag.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children
            .iter()
            .filter(move |c| c.is_element() && c.tag == tag)
    }
}
