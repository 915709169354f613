//! Registry lookup over plain HTTP.
//!
//! ```text
//! GET http://<host:port>/name/<escaped name>
//!
//! {"npub": "npub1...", "relays": ["wss://relay.example"]}
//! ```

use async_trait::async_trait;
use bond_dns_application::ports::RegistryClient;
use bond_dns_domain::{DomainError, NameResolution, RegistryEndpoint};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

pub struct HttpRegistryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRegistryClient {
    pub fn new(endpoint: &RegistryEndpoint, timeout: Duration) -> Result<Self, DomainError> {
        let base_url = Url::parse(&format!("http://{}/", endpoint)).map_err(|e| {
            DomainError::RegistryLookup(format!("Invalid registry endpoint {}: {}", endpoint, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| DomainError::RegistryLookup(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// URL queried for `domain`, with the name escaped as one path segment.
    pub fn lookup_url(&self, domain: &str) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DomainError::RegistryLookup(format!("Registry URL {} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .push("name")
            .push(domain);
        Ok(url)
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn lookup(&self, domain: &str) -> Result<NameResolution, DomainError> {
        let url = self.lookup_url(domain)?;

        debug!(url = %url, "Registry lookup");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DomainError::RegistryLookup(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::RegistryLookup(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::RegistryLookup(format!("Failed to read body from {}: {}", url, e))
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            DomainError::RegistryLookup(format!("Malformed registry response from {}: {}", url, e))
        })
    }
}
