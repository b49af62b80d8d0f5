//! Catalog data types: contexts, messages and their translations.

mod context;
mod message;
mod message_id;

pub use context::Context;
pub use message::{Location, Message, Translation, TranslationStatus, TranslationText};
pub use message_id::MessageId;
