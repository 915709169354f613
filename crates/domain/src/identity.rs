//! NIP-19 identity decoding.
//!
//! Hostnames map to a Nostr identity published as a bech32 string. Only the
//! `npub` payload carries a public key; every other NIP-19 kind (`nsec`,
//! `note`, ...) decodes fine but is not usable for resolution.

use crate::errors::DomainError;
use bech32::{Bech32, Hrp};
use std::fmt;
use std::str::FromStr;

pub const NPUB_PREFIX: &str = "npub";

/// x-only secp256k1 public key, as carried by `npub` identities and the
/// `pubkey` field of relay events.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PublicKey::LEN]);

impl PublicKey {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DomainError> {
        let raw: [u8; Self::LEN] = bytes.try_into().map_err(|_| {
            DomainError::IdentityDecode(format!(
                "public key must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub fn from_hex(encoded: &str) -> Result<Self, DomainError> {
        let bytes = hex::decode(encoded)
            .map_err(|e| DomainError::IdentityDecode(format!("invalid hex public key: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Decodes an `npub` string, rejecting any other NIP-19 payload kind.
    pub fn from_npub(encoded: &str) -> Result<Self, DomainError> {
        match DecodedIdentity::decode(encoded)? {
            DecodedIdentity::PublicKey(key) => Ok(key),
            DecodedIdentity::Other { kind, .. } => Err(DomainError::IdentityDecode(format!(
                "expected {} payload, got {}",
                NPUB_PREFIX, kind
            ))),
        }
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Lowercase hex, the encoding relays use for `authors` and `pubkey`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn to_npub(&self) -> Result<String, DomainError> {
        let hrp = Hrp::parse(NPUB_PREFIX)
            .map_err(|e| DomainError::IdentityDecode(format!("invalid prefix: {}", e)))?;
        bech32::encode::<Bech32>(hrp, &self.0)
            .map_err(|e| DomainError::IdentityDecode(format!("failed to encode npub: {}", e)))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_npub(s)
    }
}

/// Result of decoding a NIP-19 string: either a public key or some other
/// payload kind that callers must reject explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedIdentity {
    PublicKey(PublicKey),
    Other { kind: String, data: Vec<u8> },
}

impl DecodedIdentity {
    pub fn decode(encoded: &str) -> Result<Self, DomainError> {
        let (hrp, data) = bech32::decode(encoded)
            .map_err(|e| DomainError::IdentityDecode(format!("{:?}: {}", encoded, e)))?;
        let kind = hrp.to_string().to_ascii_lowercase();

        if kind == NPUB_PREFIX {
            return PublicKey::from_slice(&data).map(Self::PublicKey);
        }

        Ok(Self::Other { kind, data })
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::PublicKey(_) => NPUB_PREFIX,
            Self::Other { kind, .. } => kind,
        }
    }
}
