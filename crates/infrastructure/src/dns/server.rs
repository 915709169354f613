use crate::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use crate::dns::transport::udp::MAX_UDP_RESPONSE_SIZE;
use crate::dns::wire::{decode_message, encode_message};
use async_trait::async_trait;
use bond_dns_application::ports::{client_writes, DnsHandler, RequestContext, ResponseWriter};
use bond_dns_application::use_cases::ResponseBuilder;
use bond_dns_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Idle time after which a TCP client connection is closed.
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosts a handler chain on UDP and TCP listeners.
///
/// Each datagram and each TCP connection is served on its own task. When the
/// chain returns an rcode it did not write itself, or fails outright, the
/// host writes the error reply.
pub struct DnsServer {
    handler: Arc<dyn DnsHandler>,
    server_name: Arc<str>,
}

impl DnsServer {
    pub fn new(handler: Arc<dyn DnsHandler>, server_name: impl Into<Arc<str>>) -> Self {
        Self {
            handler,
            server_name: server_name.into(),
        }
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub async fn serve_udp(
        self: Arc<Self>,
        socket: UdpSocket,
        shutdown: CancellationToken,
    ) -> Result<(), DomainError> {
        let socket = Arc::new(socket);
        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        info!(
            addr = ?socket.local_addr().ok(),
            handler = self.handler.name(),
            "DNS UDP listener started"
        );

        loop {
            let (len, peer) = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = socket.recv_from(&mut buf) => match result {
                    Ok(received) => received,
                    Err(e) => {
                        warn!(error = %e, "UDP receive failed");
                        continue;
                    }
                },
            };

            let request = match decode_message(&buf[..len]) {
                Ok(request) => request,
                Err(e) => {
                    debug!(client = %peer, error = %e, "Dropping malformed datagram");
                    continue;
                }
            };

            let server = Arc::clone(&self);
            let socket = Arc::clone(&socket);
            tokio::spawn(async move {
                let ctx = RequestContext::new(Arc::clone(&server.server_name), peer, "udp");
                let mut writer = UdpResponseWriter::new(socket, peer);
                server.dispatch(&ctx, &mut writer, &request).await;
            });
        }

        info!("DNS UDP listener stopped");
        Ok(())
    }

    pub async fn serve_tcp(
        self: Arc<Self>,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), DomainError> {
        info!(
            addr = ?listener.local_addr().ok(),
            handler = self.handler.name(),
            "DNS TCP listener started"
        );

        loop {
            let (stream, peer) = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = listener.accept() => match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "TCP accept failed");
                        continue;
                    }
                },
            };

            let server = Arc::clone(&self);
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = shutdown.cancelled() => {}
                    _ = server.serve_connection(stream, peer) => {}
                }
            });
        }

        info!("DNS TCP listener stopped");
        Ok(())
    }

    async fn serve_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let (mut reader, writer) = stream.into_split();
        let mut writer = TcpResponseWriter::new(writer);
        let ctx = RequestContext::new(Arc::clone(&self.server_name), peer, "tcp");

        loop {
            let bytes =
                match tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut reader))
                    .await
                {
                    Ok(Ok(bytes)) => bytes,
                    Ok(Err(_)) => break,
                    Err(_) => {
                        debug!(client = %peer, "TCP connection idle, closing");
                        break;
                    }
                };

            let request = match decode_message(&bytes) {
                Ok(request) => request,
                Err(e) => {
                    debug!(client = %peer, error = %e, "Dropping malformed TCP message");
                    break;
                }
            };

            self.dispatch(&ctx, &mut writer, &request).await;
        }
    }

    /// Runs the handler chain for one request and writes the error reply
    /// when the chain did not write one.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) {
        let rcode = match self.handler.serve_dns(ctx, writer, request).await {
            Ok(rcode) if client_writes(rcode) => {
                debug!(client = %ctx.client, protocol = ctx.protocol, rcode = ?rcode, "Query served");
                return;
            }
            Ok(rcode) => rcode,
            Err(e) => {
                error!(
                    handler = self.handler.name(),
                    client = %ctx.client,
                    error = %e,
                    "Handler chain failed"
                );
                ResponseCode::ServFail
            }
        };

        let reply = ResponseBuilder::error(request, rcode);
        if let Err(e) = writer.write_msg(&reply).await {
            warn!(client = %ctx.client, rcode = ?rcode, error = %e, "Failed to write error reply");
        }
    }
}

pub struct UdpResponseWriter {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

impl UdpResponseWriter {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self { socket, peer }
    }
}

#[async_trait]
impl ResponseWriter for UdpResponseWriter {
    async fn write_msg(&mut self, response: &Message) -> Result<(), DomainError> {
        let bytes = encode_message(response)?;
        self.socket
            .send_to(&bytes, self.peer)
            .await
            .map_err(|e| DomainError::Transport(format!("UDP send to {} failed: {}", self.peer, e)))?;
        Ok(())
    }
}

pub struct TcpResponseWriter {
    stream: OwnedWriteHalf,
}

impl TcpResponseWriter {
    pub fn new(stream: OwnedWriteHalf) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl ResponseWriter for TcpResponseWriter {
    async fn write_msg(&mut self, response: &Message) -> Result<(), DomainError> {
        let bytes = encode_message(response)?;
        send_with_length_prefix(&mut self.stream, &bytes).await
    }
}
