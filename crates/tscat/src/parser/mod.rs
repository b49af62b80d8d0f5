//! Qt Linguist `.ts` document parser.
//!
//! This module reads the XML document into plain data ([`TsDocument`]) that
//! the runtime indexes into a [`Catalog`](crate::Catalog). The document types
//! are public for tooling that wants the raw, unindexed structure.

mod document;
pub mod error;

pub use document::{TsDocument, parse_document, parse_document_str};
pub use error::ParseError;
