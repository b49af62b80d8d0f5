//! Parse error types for `.ts` documents.

use thiserror::Error;

/// An error that occurred while parsing a `.ts` document.
///
/// Any parse error aborts the whole load: there is no partially valid
/// catalog.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed XML or a structural violation, with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The document ended while an element was still open.
    #[error("unexpected end of input at {line}:{column}: <{element}> is not closed")]
    UnexpectedEof {
        line: usize,
        column: usize,
        element: String,
    },

    /// Invalid UTF-8 in input.
    #[error("invalid UTF-8 in input")]
    InvalidUtf8,

    /// The XML declaration names an encoding other than UTF-8.
    #[error("unsupported document encoding '{encoding}', expected UTF-8")]
    UnsupportedEncoding { encoding: String },
}

impl ParseError {
    /// The 1-based line and column of the error, when it has one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax { line, column, .. }
            | ParseError::UnexpectedEof { line, column, .. } => Some((*line, *column)),
            ParseError::InvalidUtf8 | ParseError::UnsupportedEncoding { .. } => None,
        }
    }
}
