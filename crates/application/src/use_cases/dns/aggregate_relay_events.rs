use crate::ports::RelayClient;
use bond_dns_domain::{
    AddressSelector, DomainError, EventKind, PublicKey, RelayFilter, ResolvedAddress,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct RelayQueryOptions {
    /// Maximum events requested from each relay.
    pub limit: usize,
    /// Deadline shared by every relay subscription of one query.
    pub timeout: Duration,
    pub kind: EventKind,
}

impl Default for RelayQueryOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            timeout: Duration::from_secs(5),
            kind: EventKind::TEXT_NOTE,
        }
    }
}

/// Fans one subscription out to every relay, merges the returned
/// announcements and keeps the freshest IPv4 one.
///
/// Relays that fail or never answer are skipped. The call returns once every
/// subscription has finished or the deadline elapsed, whichever comes first.
pub struct AggregateRelayEventsUseCase {
    relay_client: Arc<dyn RelayClient>,
    options: RelayQueryOptions,
}

impl AggregateRelayEventsUseCase {
    pub fn new(relay_client: Arc<dyn RelayClient>, options: RelayQueryOptions) -> Self {
        Self {
            relay_client,
            options,
        }
    }

    pub async fn execute(
        &self,
        npub: &str,
        author: PublicKey,
        relays: &[String],
    ) -> Result<ResolvedAddress, DomainError> {
        let filter = RelayFilter::new(&author, self.options.kind, self.options.limit);
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut subscriptions = JoinSet::new();

        debug!(relays = relays.len(), author = %author, "Querying relays");

        for relay in relays {
            let client = Arc::clone(&self.relay_client);
            let relay = relay.clone();
            let filter = filter.clone();
            let events = tx.clone();
            let cancel = cancel.clone();

            subscriptions.spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(relay = %relay, "Relay subscription cancelled");
                    }
                    result = client.fetch(&relay, &filter, events) => {
                        if let Err(e) = result {
                            debug!(relay = %relay, error = %e, "Relay skipped");
                        }
                    }
                }
            });
        }

        // Only the subscription tasks hold senders now; the channel closes
        // when the last of them finishes.
        drop(tx);

        let mut selector = AddressSelector::new();
        let drained = timeout(self.options.timeout, async {
            while let Some(event) = rx.recv().await {
                if event.author != author {
                    warn!(expected = %author, got = %event.author, "Dropping event from unexpected author");
                    continue;
                }
                if selector.observe(&event) {
                    debug!(content = %event.content, created_at = event.created_at, "New latest announcement");
                }
            }
        })
        .await;

        if drained.is_err() {
            debug!(
                timeout_ms = self.options.timeout.as_millis() as u64,
                "Relay deadline reached"
            );
        }

        cancel.cancel();
        subscriptions.shutdown().await;

        debug!(
            accepted = selector.accepted(),
            rejected = selector.rejected(),
            "Relay events drained"
        );

        selector.finish().ok_or_else(|| {
            let err = DomainError::NoAddressFound {
                npub: npub.to_string(),
                relays: relays.to_vec(),
            };
            warn!(error = %err, "Relay aggregation produced no address");
            err
        })
    }
}
