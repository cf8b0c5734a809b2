//! Paper sizes.
//!
//! [CSS Paged Media § 7.1 Page size: the size property](https://www.w3.org/TR/css-page-3/#page-size-prop)

use std::str::FromStr;

use quire_common::warning::warn_once;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::error::ValueError;
use crate::style::length::{MEDIUM_FONT_SIZE, PT_PER_IN, PT_PER_MM, resolve};

/// "<page-size>: A page size can be specified using one of the following
/// media names."
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum PaperName {
    A5,
    A4,
    A3,
    B5,
    Letter,
    Legal,
    Ledger,
}

impl PaperName {
    /// Portrait dimensions in points.
    #[must_use]
    pub fn size(self) -> PageSize {
        match self {
            Self::A5 => PageSize::from_mm(148.0, 210.0),
            Self::A4 => PageSize::from_mm(210.0, 297.0),
            Self::A3 => PageSize::from_mm(297.0, 420.0),
            Self::B5 => PageSize::from_mm(176.0, 250.0),
            Self::Letter => PageSize::from_inches(8.5, 11.0),
            Self::Legal => PageSize::from_inches(8.5, 14.0),
            Self::Ledger => PageSize::from_inches(11.0, 17.0),
        }
    }
}

/// Physical page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
}

impl Default for PageSize {
    fn default() -> Self {
        PaperName::A4.size()
    }
}

impl PageSize {
    /// A size given in millimeters.
    #[must_use]
    pub fn from_mm(width: f32, height: f32) -> Self {
        Self {
            width: width * PT_PER_MM,
            height: height * PT_PER_MM,
        }
    }

    /// A size given in inches.
    #[must_use]
    pub fn from_inches(width: f32, height: f32) -> Self {
        Self {
            width: width * PT_PER_IN,
            height: height * PT_PER_IN,
        }
    }

    /// "landscape: The page's long sides are horizontal."
    #[must_use]
    pub fn landscape(self) -> Self {
        if self.width < self.height {
            Self {
                width: self.height,
                height: self.width,
            }
        } else {
            self
        }
    }

    /// "portrait: The page's short sides are horizontal."
    #[must_use]
    pub fn portrait(self) -> Self {
        if self.width > self.height {
            Self {
                width: self.height,
                height: self.width,
            }
        } else {
            self
        }
    }

    /// Parse a `size` value: `auto`, one or two lengths, or a paper name
    /// with an optional orientation. Unknown names fall back to A4.
    ///
    /// # Errors
    ///
    /// [`ValueError::Malformed`] if a length does not parse.
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let tokens: Vec<String> = value
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let lengths: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| t.starts_with(|c: char| c.is_ascii_digit() || c == '.'))
            .collect();
        if !lengths.is_empty() {
            let width = resolve(lengths[0], MEDIUM_FONT_SIZE, None)?;
            let height = match lengths.get(1) {
                Some(h) => resolve(h, MEDIUM_FONT_SIZE, None)?,
                None => width,
            };
            return Ok(Self { width, height });
        }

        let mut size = Self::default();
        for token in &tokens {
            match token.as_str() {
                "auto" => {}
                "landscape" => size = size.landscape(),
                "portrait" => size = size.portrait(),
                name => match PaperName::from_str(name) {
                    Ok(paper) => size = paper.size(),
                    Err(_) => warn_once("page", &format!("unknown page size '{name}', using A4")),
                },
            }
        }
        // Orientation may come before or after the name.
        if tokens.iter().any(|t| t == "landscape") {
            size = size.landscape();
        }
        Ok(size)
    }
}
