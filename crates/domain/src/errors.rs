use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Expected exactly one question, got {0}")]
    QueryShape(usize),

    #[error("Registry lookup failed: {0}")]
    RegistryLookup(String),

    #[error("Invalid npub: {0}")]
    IdentityDecode(String),

    #[error("No valid IPv4 address found for npub: {npub} on relays {}", relays.join(","))]
    NoAddressFound { npub: String, relays: Vec<String> },

    #[error("Failed to write DNS response: {0}")]
    ResponseWrite(String),

    #[error("Invalid relay event: {0}")]
    InvalidEvent(String),

    #[error("Relay {relay} failed: {reason}")]
    RelayFailure { relay: String, reason: String },

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No next handler found after {0}")]
    NoNextHandler(&'static str),
}

impl DomainError {
    /// Errors that hand the query over to the next handler instead of
    /// answering it.
    pub fn is_fallthrough(&self) -> bool {
        matches!(
            self,
            Self::QueryShape(_)
                | Self::RegistryLookup(_)
                | Self::IdentityDecode(_)
                | Self::NoAddressFound { .. }
        )
    }
}
