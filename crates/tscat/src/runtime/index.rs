//! Message index for `(context, source, disambiguation)` lookups.

use std::collections::HashMap;

use crate::runtime::options::DuplicatePolicy;
use crate::types::MessageId;

/// Position of a message inside a catalog: context index, message index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MessageRef {
    pub context: usize,
    pub message: usize,
}

/// Outcome of inserting a key into the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insert {
    /// The key was new.
    Added,
    /// The key was already present; `previous` is the message that held it
    /// before the insert.
    Duplicate { previous: MessageRef },
}

/// Index over the live messages of a catalog.
///
/// Keys are [`MessageId`] hashes and each one maps to a bucket of messages in
/// document order. Different keys can share a hash, so callers verify the
/// stored strings of every candidate.
#[derive(Debug, Default)]
pub(crate) struct MessageIndex {
    /// Exact `(context, source, disambiguation)` keys.
    exact: HashMap<MessageId, Vec<MessageRef>>,
    /// `(context, source, none)` keys, for every live message with that
    /// source whatever its disambiguation.
    by_source: HashMap<MessageId, Vec<MessageRef>>,
    /// Distinct exact keys.
    keys: usize,
}

impl MessageIndex {
    /// Index a message under its exact key and its source-only key.
    ///
    /// `same_key` tells whether an already indexed message has the same
    /// strings as the one being inserted.
    pub fn insert(
        &mut self,
        exact: MessageId,
        source_only: MessageId,
        at: MessageRef,
        policy: DuplicatePolicy,
        same_key: impl Fn(MessageRef) -> bool,
    ) -> Insert {
        self.by_source.entry(source_only).or_default().push(at);
        let bucket = self.exact.entry(exact).or_default();
        match bucket.iter_mut().find(|existing| same_key(**existing)) {
            Some(slot) => {
                let previous = *slot;
                if policy == DuplicatePolicy::LastWins {
                    *slot = at;
                }
                Insert::Duplicate { previous }
            }
            None => {
                bucket.push(at);
                self.keys += 1;
                Insert::Added
            }
        }
    }

    /// Candidates for an exact key.
    pub fn exact(&self, id: MessageId) -> impl Iterator<Item = MessageRef> + '_ {
        self.exact.get(&id).into_iter().flatten().copied()
    }

    /// Candidates for a source-only key, in document order.
    pub fn by_source(&self, id: MessageId) -> impl Iterator<Item = MessageRef> + '_ {
        self.by_source.get(&id).into_iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.keys
    }
}
