use serde::{Deserialize, Serialize};

use super::Message;

/// A named group of messages, usually one UI class such as `AddressBookPage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,

    /// Optional context-level `<comment>`.
    pub comment: Option<String>,

    /// Messages in document order, obsolete ones included.
    pub messages: Vec<Message>,
}

impl Context {
    /// Create an empty context with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Context {
            name: name.into(),
            ..Context::default()
        }
    }

    /// Messages that take part in lookups.
    pub fn live_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|message| message.is_live())
    }
}
