use super::message::{ClientMessage, RelayMessage};
use async_trait::async_trait;
use bond_dns_application::ports::RelayClient;
use bond_dns_domain::{AnnouncementEvent, DomainError, RelayFilter};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};

/// Queries one relay per call over a fresh websocket connection.
///
/// Events are verified before they are forwarded: a bad id or signature, an
/// author outside the filter or the wrong kind drops the event. The call ends
/// at `EOSE`, `CLOSED`, after `filter.limit` forwarded events, or when the
/// relay hangs up.
#[derive(Debug, Default, Clone)]
pub struct WebSocketRelayClient;

impl WebSocketRelayClient {
    pub fn new() -> Self {
        Self
    }

    fn subscription_id() -> String {
        format!("bond-{:016x}", fastrand::u64(..))
    }
}

#[async_trait]
impl RelayClient for WebSocketRelayClient {
    async fn fetch(
        &self,
        relay: &str,
        filter: &RelayFilter,
        events: mpsc::Sender<AnnouncementEvent>,
    ) -> Result<(), DomainError> {
        let failure = |reason: String| DomainError::RelayFailure {
            relay: relay.to_string(),
            reason,
        };

        let (mut socket, _) = connect_async(relay)
            .await
            .map_err(|e| failure(format!("connect: {}", e)))?;

        let subscription_id = Self::subscription_id();
        let req = ClientMessage::Req {
            subscription_id: subscription_id.clone(),
            filter: filter.clone(),
        };
        socket
            .send(WsMessage::Text(req.to_json()?))
            .await
            .map_err(|e| failure(format!("send REQ: {}", e)))?;

        debug!(relay = %relay, subscription = %subscription_id, "Subscribed");

        let mut forwarded = 0usize;
        while let Some(frame) = socket.next().await {
            let text = match frame {
                Ok(WsMessage::Text(text)) => text,
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => return Err(failure(format!("read: {}", e))),
            };

            match RelayMessage::parse(&text) {
                Ok(RelayMessage::Event {
                    subscription_id: sub,
                    event,
                }) if sub == subscription_id => {
                    if let Err(e) = event.verify() {
                        warn!(relay = %relay, error = %e, "Dropping unverifiable event");
                        continue;
                    }
                    if !filter.matches_kind(event.kind) {
                        debug!(relay = %relay, kind = event.kind.0, "Dropping event of unrequested kind");
                        continue;
                    }
                    let announcement = match event.into_announcement() {
                        Ok(announcement) if filter.matches_author(&announcement.author) => {
                            announcement
                        }
                        Ok(announcement) => {
                            warn!(relay = %relay, author = %announcement.author, "Dropping event from unrequested author");
                            continue;
                        }
                        Err(e) => {
                            warn!(relay = %relay, error = %e, "Dropping event with bad author");
                            continue;
                        }
                    };
                    if events.send(announcement).await.is_err() {
                        break;
                    }
                    forwarded += 1;
                    if forwarded >= filter.limit {
                        debug!(relay = %relay, limit = filter.limit, "Event limit reached");
                        break;
                    }
                }
                Ok(RelayMessage::Eose { subscription_id: sub }) if sub == subscription_id => {
                    break;
                }
                Ok(RelayMessage::Closed {
                    subscription_id: sub,
                    reason,
                }) if sub == subscription_id => {
                    debug!(relay = %relay, reason = %reason, "Subscription closed by relay");
                    break;
                }
                Ok(RelayMessage::Notice { message }) => {
                    debug!(relay = %relay, notice = %message, "Relay notice");
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(relay = %relay, error = %e, "Ignoring unparseable frame");
                }
            }
        }

        debug!(relay = %relay, events = forwarded, "Subscription finished");

        let close = ClientMessage::Close { subscription_id };
        if let Ok(text) = close.to_json() {
            let _ = socket.send(WsMessage::Text(text)).await;
        }
        let _ = socket.close(None).await;

        Ok(())
    }
}
