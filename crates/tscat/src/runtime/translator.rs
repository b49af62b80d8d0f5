//! The active-catalog holder used by applications.
//!
//! A [`Translator`] owns one [`Catalog`] at a time and hands out lookups
//! against it. Loading a new catalog builds it off to the side and swaps it
//! in atomically, so readers on other threads see either the old catalog or
//! the new one, never a mix. A failed load leaves the active catalog as it
//! was.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use bon::Builder;
use tracing::{debug, warn};

use crate::runtime::catalog::{Catalog, load_with, substitute_count};
use crate::runtime::error::LoadError;
use crate::runtime::options::LoadOptions;

/// Name reported in errors for catalogs loaded from memory.
const IN_MEMORY: &str = "<memory>";

/// The active catalog and the file it came from, swapped as one value.
#[derive(Debug, Default)]
struct Active {
    catalog: Arc<Catalog>,
    path: Option<PathBuf>,
}

/// Thread-safe holder of the active translation catalog.
///
/// Lookups never fail: when the active catalog has no usable translation
/// the source text is returned, which is what a UI shows for an untranslated
/// string.
///
/// # Example
///
/// ```
/// use tscat::Translator;
///
/// let translator = Translator::new();
/// assert_eq!(translator.translate("AddressBookPage", "&New"), "&New");
///
/// translator.load_str(r#"<TS version="2.1" language="ko">
/// <context>
///     <name>AddressBookPage</name>
///     <message>
///         <source>&amp;New</source>
///         <translation>&amp;새 항목</translation>
///     </message>
/// </context>
/// </TS>"#).unwrap();
/// assert_eq!(translator.translate("AddressBookPage", "&New"), "&새 항목");
/// ```
#[derive(Builder)]
pub struct Translator {
    /// Options applied to every catalog this translator loads.
    #[builder(default)]
    options: LoadOptions,

    /// Active catalog plus its path for [`Translator::reload`].
    #[builder(skip = ArcSwap::from_pointee(Active::default()))]
    active: ArcSwap<Active>,
}

impl Default for Translator {
    fn default() -> Self {
        Translator::builder().build()
    }
}

impl Translator {
    /// A translator with an empty catalog and default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Translator::builder().options(options).build()
    }

    /// A translator loaded from `path`, or empty if the file cannot be
    /// loaded. The failure is logged.
    pub fn from_file_or_empty(path: impl AsRef<Path>) -> Self {
        let translator = Translator::new();
        if let Err(err) = translator.load_file(path) {
            warn!(error = %err, "starting with an empty catalog");
        }
        translator
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    // =========================================================================
    // Catalog Management
    // =========================================================================

    /// Snapshot of the active catalog.
    ///
    /// The snapshot stays valid after later swaps; use it to run several
    /// lookups against one consistent catalog.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.active.load().catalog)
    }

    /// Language of the active catalog.
    pub fn language(&self) -> Option<String> {
        self.active.load().catalog.language().map(str::to_owned)
    }

    /// Make `catalog` active and return the one it replaces.
    ///
    /// The catalog has no file behind it, so [`Translator::reload`] fails
    /// until the next [`Translator::load_file`].
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let previous = self.active.swap(Arc::new(Active {
            catalog: Arc::new(catalog),
            path: None,
        }));
        Arc::clone(&previous.catalog)
    }

    /// Replace the active catalog with an empty one.
    pub fn clear(&self) {
        self.install(Catalog::empty());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a catalog from a file and make it active.
    ///
    /// Returns the number of live messages. The path is remembered for
    /// [`Translator::reload`].
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.activate(&content, path, Some(path.to_path_buf()))
    }

    /// Load a catalog from a string and make it active.
    pub fn load_str(&self, content: &str) -> Result<usize, LoadError> {
        self.load_bytes(content.as_bytes())
    }

    /// Load a catalog from raw document bytes and make it active.
    pub fn load_bytes(&self, content: &[u8]) -> Result<usize, LoadError> {
        self.activate(content, Path::new(IN_MEMORY), None)
    }

    /// Load the file the active catalog came from again.
    ///
    /// Fails with [`LoadError::NoPathForReload`] when the active catalog was
    /// loaded from memory or installed directly.
    pub fn reload(&self) -> Result<usize, LoadError> {
        let path = self.active.load().path.clone().ok_or(LoadError::NoPathForReload)?;
        self.load_file(path)
    }

    fn activate(
        &self,
        content: &[u8],
        origin: &Path,
        path: Option<PathBuf>,
    ) -> Result<usize, LoadError> {
        let catalog =
            load_with(content, &self.options).map_err(|err| LoadError::from_parse(origin, err))?;
        if !catalog.warnings().is_empty() {
            warn!(
                origin = %origin.display(),
                warnings = catalog.warnings().len(),
                "catalog loaded with warnings"
            );
        }
        let count = catalog.stats().live();
        debug!(origin = %origin.display(), messages = count, "activating catalog");
        self.active.store(Arc::new(Active {
            catalog: Arc::new(catalog),
            path,
        }));
        Ok(count)
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Translation of `source` in `context`, or `source` itself.
    pub fn translate(&self, context: &str, source: &str) -> String {
        self.translate_with(context, source, None)
    }

    /// [`Translator::translate`] with a disambiguation comment.
    pub fn translate_with(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> String {
        self.active
            .load()
            .catalog
            .lookup(context, source, disambiguation)
            .unwrap_or(source)
            .to_owned()
    }

    /// Plural-aware translation for `count`.
    ///
    /// Falls back to `source` with `%n` replaced, matching what an
    /// untranslated numerus string shows.
    pub fn translate_plural(&self, context: &str, source: &str, count: i64) -> String {
        self.active
            .load()
            .catalog
            .lookup_plural(context, source, count)
            .unwrap_or_else(|| substitute_count(source, count))
    }
}
