//! Error and warning types for catalog loading.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::ParseError;

/// Errors that occur while loading a catalog into a [`Translator`](crate::Translator).
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading the translation file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parse error with file location context.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Attempted to reload a catalog that was loaded from memory.
    #[error("cannot reload: the active catalog was not loaded from a file")]
    NoPathForReload,
}

impl LoadError {
    /// Attach a path to a parse error. Errors without a position report 0:0.
    pub fn from_parse(path: &Path, err: ParseError) -> Self {
        let (line, column) = err.position().unwrap_or((0, 0));
        let message = match err {
            ParseError::Syntax { message, .. } => message,
            ParseError::UnexpectedEof { element, .. } => {
                format!("unexpected end of file: <{element}> is not closed")
            }
            other @ (ParseError::InvalidUtf8 | ParseError::UnsupportedEncoding { .. }) => {
                other.to_string()
            }
        };
        LoadError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            message,
        }
    }
}

/// A non-fatal finding about a catalog.
///
/// Duplicate warnings are collected while a catalog is built and are
/// available from [`Catalog::warnings`](crate::Catalog::warnings); the rest
/// come from [`lint_catalog`](crate::lint_catalog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadWarning {
    /// A live message repeats the key of an earlier one in the same context.
    #[error("duplicate message in '{context}' at line {line}: '{source_text}'")]
    DuplicateMessage {
        context: String,
        source_text: String,
        line: usize,
    },

    /// A context name appears more than once; its messages were merged.
    #[error("context '{name}' appears more than once")]
    DuplicateContext { name: String },

    /// A numerus message stores a different number of forms than the
    /// language defines.
    #[error("'{source_text}' in '{context}' has {found} numerus forms, language defines {expected}")]
    NumerusFormCount {
        context: String,
        source_text: String,
        expected: usize,
        found: usize,
    },

    /// Numbered placeholders differ between source and translation.
    #[error(
        "placeholder mismatch for '{source_text}' in '{context}': missing [{}], unexpected [{}]",
        missing.join(", "),
        unexpected.join(", ")
    )]
    PlaceholderMismatch {
        context: String,
        source_text: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// A live message has no translation text.
    #[error("'{source_text}' in '{context}' has no translation")]
    EmptyTranslation {
        context: String,
        source_text: String,
    },
}
