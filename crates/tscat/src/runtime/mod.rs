//! Catalog runtime: indexing, lookups, plural selection and the swappable
//! active catalog.
//!
//! A parsed document becomes an immutable [`Catalog`]. Applications usually
//! hold a [`Translator`], which keeps one catalog active and replaces it
//! atomically on reload.

mod catalog;
mod error;
mod index;
mod lint;
mod options;
mod plural;
mod translator;

pub use catalog::{Catalog, CatalogStats, load, load_with, substitute_count};
pub use error::{LoadError, LoadWarning};
pub use lint::{lint_catalog, suggest_sources};
pub use options::{DuplicatePolicy, LoadOptions};
pub use plural::{CldrPluralRule, PluralRule, SingleForm};
pub use translator::Translator;
