use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use bon::Builder;

use crate::runtime::plural::PluralRule;

/// Which message wins when a context holds the same key twice.
///
/// Every duplicate is reported as a
/// [`LoadWarning::DuplicateMessage`](crate::LoadWarning::DuplicateMessage)
/// regardless of the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the message that appears first in the document.
    #[default]
    FirstWins,
    /// Keep the message that appears last in the document.
    LastWins,
}

/// Options for building a [`Catalog`](crate::Catalog) from a document.
///
/// # Example
///
/// ```
/// use tscat::{DuplicatePolicy, LoadOptions};
///
/// let options = LoadOptions::builder()
///     .duplicate_policy(DuplicatePolicy::LastWins)
///     .language("ko".to_string())
///     .build();
/// assert_eq!(options.language.as_deref(), Some("ko"));
/// ```
#[derive(Clone, Default, Builder)]
pub struct LoadOptions {
    #[builder(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Overrides the `language` attribute of the document.
    pub language: Option<String>,

    /// Overrides the plural rule derived from the language.
    pub plural_rule: Option<Arc<dyn PluralRule>>,
}

impl Debug for LoadOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoadOptions")
            .field("duplicate_policy", &self.duplicate_policy)
            .field("language", &self.language)
            .field("plural_rule", &self.plural_rule.as_ref().map(|_| "<custom>"))
            .finish()
    }
}
