use crate::identity::PublicKey;
use std::net::Ipv4Addr;

/// A relay event whose `content` announces the author's current address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementEvent {
    pub author: PublicKey,
    /// Unix seconds, as reported by the event.
    pub created_at: u64,
    pub content: String,
}

impl AnnouncementEvent {
    pub fn new(author: PublicKey, created_at: u64, content: impl Into<String>) -> Self {
        Self {
            author,
            created_at,
            content: content.into(),
        }
    }

    /// Parses the content as a dotted-quad IPv4 literal. IPv6 and anything
    /// else yields `None`.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.content.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub ip: Ipv4Addr,
    pub observed_at: u64,
}

/// Tracks the freshest valid announcement seen so far for one query.
///
/// An event replaces the current best unless its timestamp is strictly
/// earlier, so on equal timestamps the most recently observed event wins.
#[derive(Debug, Default)]
pub struct AddressSelector {
    best: Option<ResolvedAddress>,
    latest: u64,
    accepted: usize,
    rejected: usize,
}

impl AddressSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the event became the new best.
    pub fn observe(&mut self, event: &AnnouncementEvent) -> bool {
        if event.created_at < self.latest {
            self.rejected += 1;
            return false;
        }

        let Some(ip) = event.ipv4() else {
            self.rejected += 1;
            return false;
        };

        self.latest = event.created_at;
        self.best = Some(ResolvedAddress {
            ip,
            observed_at: event.created_at,
        });
        self.accepted += 1;
        true
    }

    pub fn best(&self) -> Option<ResolvedAddress> {
        self.best
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn finish(self) -> Option<ResolvedAddress> {
        self.best
    }
}
