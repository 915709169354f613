use async_trait::async_trait;
use bond_dns_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;

/// Per-query information supplied by the DNS host.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Identity of the serving server, used as the request counter label.
    pub server: Arc<str>,
    pub client: SocketAddr,
    pub protocol: &'static str,
}

impl RequestContext {
    pub fn new(server: impl Into<Arc<str>>, client: SocketAddr, protocol: &'static str) -> Self {
        Self {
            server: server.into(),
            client,
            protocol,
        }
    }
}

/// Sink for the reply to one query.
#[async_trait]
pub trait ResponseWriter: Send {
    async fn write_msg(&mut self, response: &Message) -> Result<(), DomainError>;
}

/// One link of the handler chain.
///
/// A handler either writes a reply through `writer` and returns its response
/// code, or hands the query to the next handler. Returning SERVFAIL, REFUSED,
/// FORMERR or NOTIMP without writing tells the host to write the error reply.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    async fn serve_dns(
        &self,
        ctx: &RequestContext,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError>;

    fn name(&self) -> &'static str;
}

/// Whether the handler that returned `rcode` already wrote the reply itself.
pub fn client_writes(rcode: ResponseCode) -> bool {
    !matches!(
        rcode,
        ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::FormErr | ResponseCode::NotImp
    )
}
