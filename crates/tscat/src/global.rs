//! Process-wide translator for the `global` feature.
//!
//! Provides a shared [`Translator`] so UI code can call [`tr`] without
//! threading a handle through every widget. The translator starts with an
//! empty catalog, so every call returns its source text until a catalog is
//! loaded or installed.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::{Catalog, LoadError, Translator};

static GLOBAL_TRANSLATOR: LazyLock<Translator> = LazyLock::new(Translator::new);

/// Provides access to the global translator.
pub fn with_translator<T>(f: impl FnOnce(&Translator) -> T) -> T {
    f(&GLOBAL_TRANSLATOR)
}

/// Translate `source` in `context` with the global catalog.
pub fn tr(context: &str, source: &str) -> String {
    GLOBAL_TRANSLATOR.translate(context, source)
}

/// Plural-aware translation with the global catalog.
pub fn tr_n(context: &str, source: &str, count: i64) -> String {
    GLOBAL_TRANSLATOR.translate_plural(context, source, count)
}

/// Load the global catalog from a file.
pub fn load_file(path: impl AsRef<Path>) -> Result<usize, LoadError> {
    GLOBAL_TRANSLATOR.load_file(path)
}

/// Replace the global catalog, returning the previous one.
pub fn install(catalog: Catalog) -> Arc<Catalog> {
    GLOBAL_TRANSLATOR.install(catalog)
}

/// Language of the global catalog.
pub fn language() -> Option<String> {
    GLOBAL_TRANSLATOR.language()
}
