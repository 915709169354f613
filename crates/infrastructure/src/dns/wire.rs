//! DNS wire format helpers on top of `hickory-proto`.

use bond_dns_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Serializes a message to wire format bytes.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);

    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::Transport(format!("Failed to serialize DNS message: {}", e)))?;

    Ok(buf)
}

pub fn decode_message(bytes: &[u8]) -> Result<Message, DomainError> {
    Message::from_vec(bytes)
        .map_err(|e| DomainError::Transport(format!("Failed to parse DNS message: {}", e)))
}
