use bond_dns_domain::{AnnouncementEvent, DomainError, EventKind, PublicKey};
use k256::schnorr::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A signed NIP-01 event as delivered by a relay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelayEvent {
    pub id: String,
    pub pubkey: String,
    pub created_at: u64,
    pub kind: EventKind,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    pub content: String,
    pub sig: String,
}

impl RelayEvent {
    /// sha256 over `[0, pubkey, created_at, kind, tags, content]`.
    pub fn compute_id(
        pubkey: &str,
        created_at: u64,
        kind: EventKind,
        tags: &[Vec<String>],
        content: &str,
    ) -> Result<[u8; 32], DomainError> {
        let canonical = serde_json::to_string(&(0u8, pubkey, created_at, kind, tags, content))
            .map_err(|e| DomainError::InvalidEvent(format!("Failed to serialize event: {}", e)))?;
        Ok(Sha256::digest(canonical.as_bytes()).into())
    }

    /// Checks the id hash and the schnorr signature against `pubkey`.
    pub fn verify(&self) -> Result<(), DomainError> {
        let expected =
            Self::compute_id(&self.pubkey, self.created_at, self.kind, &self.tags, &self.content)?;

        let id = decode_hex::<32>(&self.id, "id")?;
        if id != expected {
            return Err(DomainError::InvalidEvent(format!("id mismatch for {}", self.id)));
        }

        let pubkey = decode_hex::<32>(&self.pubkey, "pubkey")?;
        let key = VerifyingKey::from_bytes(&pubkey)
            .map_err(|e| DomainError::InvalidEvent(format!("bad pubkey {}: {}", self.pubkey, e)))?;

        let sig = decode_hex::<64>(&self.sig, "sig")?;
        let signature = Signature::try_from(sig.as_slice())
            .map_err(|e| DomainError::InvalidEvent(format!("bad signature encoding: {}", e)))?;

        key.verify_raw(&id, &signature)
            .map_err(|_| DomainError::InvalidEvent(format!("signature check failed for {}", self.id)))
    }

    pub fn author(&self) -> Result<PublicKey, DomainError> {
        PublicKey::from_hex(&self.pubkey)
    }

    pub fn into_announcement(self) -> Result<AnnouncementEvent, DomainError> {
        let author = self.author()?;
        Ok(AnnouncementEvent::new(author, self.created_at, self.content))
    }
}

fn decode_hex<const N: usize>(value: &str, field: &str) -> Result<[u8; N], DomainError> {
    let mut out = [0u8; N];
    hex::decode_to_slice(value, &mut out)
        .map_err(|e| DomainError::InvalidEvent(format!("bad {} hex: {}", field, e)))?;
    Ok(out)
}
