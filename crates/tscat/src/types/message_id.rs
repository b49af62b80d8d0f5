use std::fmt::{Display, Formatter, Result as FmtResult};

use const_fnv1a_hash::fnv1a_hash_str_64;
use serde::{Deserialize, Serialize};

/// FNV-1a 64-bit prime, used to fold the key parts together.
const FOLD_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Starting state, so the context is mixed before the source is folded in.
const SEED: u64 = 0xcbf2_9ce4_8422_2325;

/// Folded in place of the disambiguation comment when there is none.
const NO_COMMENT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A compact, serializable key for a message within a catalog.
///
/// `MessageId` hashes the `(context, source, disambiguation)` triple that Qt
/// uses to identify a translatable string. Catalog lookups hash the caller's
/// strings into a `MessageId` so no key allocation happens on the hot path.
/// Distinct keys may still share an id; the catalog keeps every message
/// under its id and verifies the stored strings on each hit.
///
/// # Example
///
/// ```
/// use tscat::MessageId;
///
/// const NEW_ADDRESS: MessageId = MessageId::new("AddressBookPage", "&New", None);
///
/// let same = MessageId::new("AddressBookPage", "&New", None);
/// assert_eq!(NEW_ADDRESS, same);
/// assert_ne!(NEW_ADDRESS, MessageId::new("AddressBookPage", "&New", Some("menu")));
/// ```
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Create a `MessageId` from its key parts.
    ///
    /// This is a `const fn`, so well-known messages can be declared as
    /// constants.
    pub const fn new(context: &str, source: &str, disambiguation: Option<&str>) -> Self {
        let mut hash = fold(SEED, fnv1a_hash_str_64(context));
        hash = fold(hash, fnv1a_hash_str_64(source));
        hash = match disambiguation {
            Some(comment) => fold(hash, fnv1a_hash_str_64(comment)),
            None => fold(hash, NO_COMMENT),
        };
        Self(hash)
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

const fn fold(hash: u64, part: u64) -> u64 {
    (hash ^ part).wrapping_mul(FOLD_PRIME).rotate_left(29)
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "MessageId({:016x})", self.0)
    }
}
