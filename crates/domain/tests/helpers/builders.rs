#![allow(dead_code)]
use bech32::{Bech32, Hrp};
use bond_dns_domain::{AnnouncementEvent, PublicKey};

pub fn test_key(byte: u8) -> PublicKey {
    PublicKey::from_bytes([byte; PublicKey::LEN])
}

/// Encodes an arbitrary NIP-19 payload, e.g. `nsec` or `note`.
pub fn encode_nip19(prefix: &str, data: &[u8]) -> String {
    bech32::encode::<Bech32>(Hrp::parse(prefix).unwrap(), data).unwrap()
}

pub struct AnnouncementBuilder {
    author: PublicKey,
    created_at: u64,
    content: String,
}

impl AnnouncementBuilder {
    pub fn new() -> Self {
        Self {
            author: test_key(7),
            created_at: 100,
            content: "10.0.0.1".to_string(),
        }
    }

    pub fn author(mut self, author: PublicKey) -> Self {
        self.author = author;
        self
    }

    pub fn created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn build(self) -> AnnouncementEvent {
        AnnouncementEvent::new(self.author, self.created_at, self.content)
    }
}

pub fn announcement(content: &str, created_at: u64) -> AnnouncementEvent {
    AnnouncementBuilder::new()
        .content(content)
        .created_at(created_at)
        .build()
}
