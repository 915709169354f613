use async_trait::async_trait;
use bond_dns_domain::{AnnouncementEvent, DomainError, RelayFilter};
use tokio::sync::mpsc;

#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Subscribe to `relay` with `filter` and forward every verified event to
    /// `events` until the relay reports the end of stored events, closes the
    /// subscription, or `filter.limit` events were forwarded.
    ///
    /// Callers bound the whole call with their own deadline.
    async fn fetch(
        &self,
        relay: &str,
        filter: &RelayFilter,
        events: mpsc::Sender<AnnouncementEvent>,
    ) -> Result<(), DomainError>;
}
