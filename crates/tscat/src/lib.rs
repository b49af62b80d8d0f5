pub mod parser;
pub mod runtime;
pub mod types;

#[cfg(feature = "global")]
pub mod global;

pub use parser::{ParseError, TsDocument, parse_document, parse_document_str};
pub use runtime::{
    Catalog, CatalogStats, CldrPluralRule, DuplicatePolicy, LoadError, LoadOptions, LoadWarning,
    PluralRule, SingleForm, Translator, lint_catalog, load, load_with, substitute_count,
    suggest_sources,
};
pub use types::{
    Context, Location, Message, MessageId, Translation, TranslationStatus, TranslationText,
};
