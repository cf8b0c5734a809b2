//! Document-wide defaults.

use quire_css::{LayoutContext, PageRule, PageSelector};
use serde::{Deserialize, Serialize};

/// The settings every page and every piece of content start from.
///
/// ```json
/// { "font-family": "serif", "font-size": 10, "line-height": 1.2,
///   "page": { "size": "a4", "margin-top": "1cm" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocumentDefaults {
    /// Base font and line height.
    #[serde(flatten)]
    pub layout: LayoutContext,
    /// The rule for pages no other rule selects. Its selector is ignored.
    pub page: PageRule,
}

impl DocumentDefaults {
    /// The default page rule with its selector forced to `Default`.
    #[must_use]
    pub fn page_rule(&self) -> PageRule {
        PageRule {
            selector: PageSelector::Default,
            ..self.page.clone()
        }
    }
}
