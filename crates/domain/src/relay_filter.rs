use crate::identity::PublicKey;
use serde::{Deserialize, Serialize};

/// Nostr event kind number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventKind(pub u16);

impl EventKind {
    /// NIP-01 short text note; address announcements are published as these.
    pub const TEXT_NOTE: EventKind = EventKind(1);
}

impl Default for EventKind {
    fn default() -> Self {
        Self::TEXT_NOTE
    }
}

/// NIP-01 subscription filter, serialized as the JSON object sent in `REQ`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelayFilter {
    pub authors: Vec<String>,
    pub kinds: Vec<EventKind>,
    pub limit: usize,
}

impl RelayFilter {
    pub fn new(author: &PublicKey, kind: EventKind, limit: usize) -> Self {
        Self {
            authors: vec![author.to_hex()],
            kinds: vec![kind],
            limit,
        }
    }

    pub fn matches_author(&self, author: &PublicKey) -> bool {
        let hex = author.to_hex();
        self.authors.iter().any(|a| a.eq_ignore_ascii_case(&hex))
    }

    pub fn matches_kind(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }
}
