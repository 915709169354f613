#![allow(dead_code)]

use bond_dns_domain::{EventKind, PublicKey};
use bond_dns_infrastructure::relay::RelayEvent;
use k256::schnorr::SigningKey;

/// Publishes NIP-01 events signed with a fixed test key.
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    pub fn new(seed: u8) -> Self {
        Self {
            key: SigningKey::from_bytes(&[seed; 32]).unwrap(),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_slice(&self.key.verifying_key().to_bytes()).unwrap()
    }

    pub fn npub(&self) -> String {
        self.public_key().to_npub().unwrap()
    }

    pub fn event(&self, content: &str, created_at: u64) -> RelayEvent {
        self.event_of_kind(EventKind::TEXT_NOTE, content, created_at)
    }

    pub fn event_of_kind(&self, kind: EventKind, content: &str, created_at: u64) -> RelayEvent {
        let pubkey = self.public_key().to_hex();
        let id = RelayEvent::compute_id(&pubkey, created_at, kind, &[], content).unwrap();
        let sig = self.key.sign_raw(&id, &[0u8; 32]).unwrap();

        RelayEvent {
            id: hex::encode(id),
            pubkey,
            created_at,
            kind,
            tags: vec![],
            content: content.to_string(),
            sig: hex::encode(sig.to_bytes()),
        }
    }
}
