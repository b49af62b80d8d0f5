//! Miette diagnostic wrapper for `.ts` parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use std::fs;
use std::path::Path;

use miette::{Diagnostic, IntoDiagnostic, NamedSource, Result, SourceSpan, WrapErr};
use thiserror::Error;
use tracing::debug;
use tscat::{load, Catalog, ParseError};

/// A miette-compatible diagnostic for `.ts` parse errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tscat::parse))]
pub struct TsDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl TsDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let (line, column) = err.position().unwrap_or((1, 1));
        let help = match err {
            ParseError::UnexpectedEof { element, .. } => {
                Some(format!("add the missing </{element}> closing tag"))
            }
            ParseError::UnsupportedEncoding { .. } => {
                Some("re-save the file as UTF-8 and update the XML declaration".to_string())
            }
            ParseError::InvalidUtf8 => Some("the file is not valid UTF-8".to_string()),
            ParseError::Syntax { .. } => None,
        };

        // Lines are counted on '\n' and columns in bytes after the byte order
        // mark, as the parser does.
        let body = content.strip_prefix('\u{feff}').unwrap_or(content);
        let offset = (content.len() - body.len())
            + body
                .split_inclusive('\n')
                .take(line.saturating_sub(1))
                .map(str::len)
                .sum::<usize>()
            + column.saturating_sub(1);

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        TsDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 0).into(),
            message: err.to_string(),
            help,
        }
    }
}

/// Read and parse a catalog, turning parse failures into [`TsDiagnostic`]s.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    debug!(path = %path.display(), "reading catalog");
    let bytes = fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    load(&bytes).map_err(|err| {
        let content = String::from_utf8_lossy(&bytes);
        TsDiagnostic::from_parse_error(path, &content, &err).into()
    })
}
