use async_trait::async_trait;
use bond_dns_domain::{DomainError, NameResolution};

#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Resolve a hostname to its owner's identity and relay list.
    /// A single attempt; no retries.
    async fn lookup(&self, domain: &str) -> Result<NameResolution, DomainError>;
}
