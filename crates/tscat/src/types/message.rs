use std::slice;

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Review state of a translation, read from the `type` attribute of
/// `<translation>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    /// No `type` attribute: the translation is approved.
    #[default]
    Final,
    /// `type="unfinished"`: present but not yet reviewed. Still displayed.
    NeedsReview,
    /// `type="vanished"` (or the legacy `type="obsolete"`): kept for history
    /// and never returned by lookups.
    Obsolete,
}

impl TranslationStatus {
    /// Map the value of a `type` attribute to a status.
    ///
    /// Unknown values are treated as final, matching how Qt's own reader
    /// ignores attribute values it does not recognize.
    pub fn from_type_attribute(value: Option<&str>) -> Self {
        match value {
            Some("unfinished") => TranslationStatus::NeedsReview,
            Some("vanished" | "obsolete") => TranslationStatus::Obsolete,
            _ => TranslationStatus::Final,
        }
    }

    /// The `type` attribute value that produces this status, if any.
    pub fn type_attribute(self) -> Option<&'static str> {
        match self {
            TranslationStatus::Final => None,
            TranslationStatus::NeedsReview => Some("unfinished"),
            TranslationStatus::Obsolete => Some("vanished"),
        }
    }

    /// Whether messages with this status take part in lookups.
    pub fn is_live(self) -> bool {
        !matches!(self, TranslationStatus::Obsolete)
    }
}

/// The text of a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationText {
    /// A plain message: one string.
    Single(String),
    /// A numerus message: one string per plural form of the target language,
    /// in the order of the language's plural rule.
    Numerus(Vec<String>),
}

impl Default for TranslationText {
    fn default() -> Self {
        TranslationText::Single(String::new())
    }
}

impl TranslationText {
    /// All stored forms. A single translation has exactly one.
    pub fn forms(&self) -> &[String] {
        match self {
            TranslationText::Single(text) => slice::from_ref(text),
            TranslationText::Numerus(forms) => forms,
        }
    }

    /// The first stored form, or `""` for a numerus translation without forms.
    pub fn first(&self) -> &str {
        self.forms().first().map_or("", String::as_str)
    }

    /// True when no form carries any text.
    pub fn is_empty(&self) -> bool {
        self.forms().iter().all(String::is_empty)
    }
}

/// A translation: review state plus text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub status: TranslationStatus,
    pub text: TranslationText,
}

impl Translation {
    /// A final, single-form translation.
    pub fn final_text(text: impl Into<String>) -> Self {
        Translation {
            status: TranslationStatus::Final,
            text: TranslationText::Single(text.into()),
        }
    }
}

/// A `<location>` reference to the UI source that uses a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: String,
    pub line: Option<u32>,
}

/// A single translatable unit.
///
/// `source` is the lookup key and is stored with XML entities already
/// resolved, so `&amp;New` in the document is `&New` here.
///
/// # Example
///
/// ```
/// use tscat::{Message, Translation};
///
/// let message = Message::builder()
///     .source("&New".to_string())
///     .translation(Translation::final_text("&새 항목"))
///     .build();
///
/// assert_eq!(message.translation.text.first(), "&새 항목");
/// assert!(message.comment.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct Message {
    /// The source-language text.
    pub source: String,

    /// Disambiguation comment (`<comment>`), part of the lookup key.
    pub comment: Option<String>,

    /// Whether the message was declared with `numerus="yes"`.
    #[builder(default)]
    pub numerus: bool,

    #[builder(default)]
    pub translation: Translation,

    /// Optional `id` attribute for id-based translation tooling.
    pub id: Option<String>,

    /// Developer note for translators (`<extracomment>`).
    pub extra_comment: Option<String>,

    /// Translator's own note (`<translatorcomment>`).
    pub translator_comment: Option<String>,

    /// Previous source text kept by lupdate (`<oldsource>`).
    pub old_source: Option<String>,

    /// Previous disambiguation comment (`<oldcomment>`).
    pub old_comment: Option<String>,

    #[builder(default)]
    pub locations: Vec<Location>,

    /// Line of the `<message>` element in the document, 0 when built in code.
    #[builder(default)]
    pub line: usize,
}

impl Message {
    /// Whether this message takes part in lookups.
    pub fn is_live(&self) -> bool {
        self.translation.status.is_live()
    }
}
