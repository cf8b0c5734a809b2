//! Error types for value resolution and layout.
//!
//! Recoverable problems (unknown properties, unsupported keywords) never show
//! up here; they are logged through [`quire_common::warning::warn_once`] and
//! the declaration is dropped. Everything in this module aborts the layout
//! of the current page.

use thiserror::Error;

/// A length or number that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The numeric part of a length is not a number (`1.2.3pt`, `--4em`).
    #[error("malformed length '{value}'")]
    Malformed {
        /// The offending value, as written.
        value: String,
    },
}

/// Fatal layout failure, carrying enough context to find the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A declaration value could not be parsed.
    #[error("<{tag}>: malformed value '{value}' for '{property}'")]
    MalformedValue {
        /// Tag of the element being resolved.
        tag: String,
        /// Property name.
        property: String,
        /// The value as written.
        value: String,
    },
    /// None of the requested font families is known to the backend.
    #[error("<{tag}>: no font family matches '{family}'")]
    MissingFont {
        /// Tag of the element being resolved.
        tag: String,
        /// The `font-family` value as written.
        family: String,
    },
    /// An image could not be found or measured.
    #[error("image '{src}' could not be loaded")]
    MissingImage {
        /// The image source.
        src: String,
    },
    /// A `rowspan`/`colspan` attribute is not a non-negative integer.
    #[error("<{tag}>: invalid {attribute} '{value}'")]
    InvalidSpan {
        /// Tag of the cell.
        tag: String,
        /// `rowspan` or `colspan`.
        attribute: String,
        /// The attribute value as written.
        value: String,
    },
    /// The node handed to layout does not exist in the tree.
    #[error("node {0} is not part of the tree")]
    UnknownNode(usize),
}

impl LayoutError {
    /// Attach element and property context to a resolver failure.
    pub fn from_value(err: ValueError, tag: &str, property: &str) -> Self {
        match err {
            ValueError::Malformed { value } => Self::MalformedValue {
                tag: tag.to_string(),
                property: property.to_string(),
                value,
            },
        }
    }
}
