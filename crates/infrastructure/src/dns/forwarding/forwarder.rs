use crate::dns::transport::{DnsTransport, TcpTransport, UdpTransport};
use crate::dns::wire::{decode_message, encode_message};
use async_trait::async_trait;
use bond_dns_application::ports::{DnsHandler, RequestContext, ResponseWriter};
use bond_dns_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

pub const FORWARDER_NAME: &str = "forward";

/// Terminal handler that relays queries verbatim to one upstream resolver.
///
/// Upstream failures return SERVFAIL without writing, so the host answers.
pub struct UpstreamForwarder {
    udp: UdpTransport,
    tcp: TcpTransport,
    timeout: Duration,
}

impl UpstreamForwarder {
    pub fn new(upstream: SocketAddr, timeout: Duration) -> Self {
        Self {
            udp: UdpTransport::new(upstream),
            tcp: TcpTransport::new(upstream),
            timeout,
        }
    }

    pub fn upstream(&self) -> SocketAddr {
        self.udp.server_addr()
    }

    /// Sends over UDP and retries over TCP when the answer came back truncated.
    pub async fn exchange(&self, request: &Message) -> Result<Message, DomainError> {
        let bytes = encode_message(request)?;

        let response = self.udp.send(&bytes, self.timeout).await?;
        let message = decode_message(&response.bytes)?;

        if !message.truncated() {
            return Ok(message);
        }

        debug!(upstream = %self.upstream(), "Truncated UDP response, retrying over TCP");
        let response = self.tcp.send(&bytes, self.timeout).await?;
        decode_message(&response.bytes)
    }
}

#[async_trait]
impl DnsHandler for UpstreamForwarder {
    async fn serve_dns(
        &self,
        ctx: &RequestContext,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        let response = match self.exchange(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(upstream = %self.upstream(), client = %ctx.client, error = %e, "Upstream exchange failed");
                return Ok(ResponseCode::ServFail);
            }
        };

        if response.id() != request.id() {
            warn!(
                upstream = %self.upstream(),
                expected = request.id(),
                got = response.id(),
                "Upstream answered with mismatched id"
            );
            return Ok(ResponseCode::ServFail);
        }

        writer.write_msg(&response).await?;
        Ok(ResponseCode::NoError)
    }

    fn name(&self) -> &'static str {
        FORWARDER_NAME
    }
}
