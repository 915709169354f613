//! NIP-01 frames exchanged with a relay.

use super::event::RelayEvent;
use bond_dns_domain::{DomainError, RelayFilter};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// `["REQ", <subscription id>, <filter>]`
    Req {
        subscription_id: String,
        filter: RelayFilter,
    },
    /// `["CLOSE", <subscription id>]`
    Close { subscription_id: String },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, DomainError> {
        let frame = match self {
            Self::Req {
                subscription_id,
                filter,
            } => json!(["REQ", subscription_id, filter]),
            Self::Close { subscription_id } => json!(["CLOSE", subscription_id]),
        };
        serde_json::to_string(&frame)
            .map_err(|e| DomainError::Transport(format!("Failed to encode relay frame: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    Event {
        subscription_id: String,
        event: Box<RelayEvent>,
    },
    Eose {
        subscription_id: String,
    },
    Closed {
        subscription_id: String,
        reason: String,
    },
    Notice {
        message: String,
    },
    /// Any other frame type (`OK`, `AUTH`, `COUNT`, ...).
    Other { label: String },
}

impl RelayMessage {
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let frame: Vec<Value> = serde_json::from_str(text)
            .map_err(|e| DomainError::Transport(format!("Malformed relay frame: {}", e)))?;

        let label = frame
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::Transport("Relay frame without label".to_string()))?;

        let string_at = |idx: usize| -> Result<String, DomainError> {
            frame
                .get(idx)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    DomainError::Transport(format!("{} frame missing field {}", label, idx))
                })
        };

        match label {
            "EVENT" => {
                let raw = frame.get(2).cloned().ok_or_else(|| {
                    DomainError::Transport("EVENT frame without event".to_string())
                })?;
                let event: RelayEvent = serde_json::from_value(raw)
                    .map_err(|e| DomainError::InvalidEvent(e.to_string()))?;
                Ok(Self::Event {
                    subscription_id: string_at(1)?,
                    event: Box::new(event),
                })
            }
            "EOSE" => Ok(Self::Eose {
                subscription_id: string_at(1)?,
            }),
            "CLOSED" => Ok(Self::Closed {
                subscription_id: string_at(1)?,
                reason: string_at(2).unwrap_or_default(),
            }),
            "NOTICE" => Ok(Self::Notice {
                message: string_at(1)?,
            }),
            other => Ok(Self::Other {
                label: other.to_string(),
            }),
        }
    }
}
