use super::{AggregateRelayEventsUseCase, QueryExtractor, ResponseBuilder};
use crate::ports::{DnsHandler, RegistryClient, RequestContext, RequestCounter, ResponseWriter};
use async_trait::async_trait;
use bond_dns_domain::{DomainError, PublicKey, ResolvedAddress};
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const HANDLER_NAME: &str = "bond-dns";

/// Answers A queries for names published through the registry and relays,
/// and hands everything it cannot answer to the next handler.
pub struct HandleDnsQueryUseCase {
    registry: Arc<dyn RegistryClient>,
    aggregator: Arc<AggregateRelayEventsUseCase>,
    request_counter: Arc<dyn RequestCounter>,
    next: Option<Arc<dyn DnsHandler>>,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        aggregator: Arc<AggregateRelayEventsUseCase>,
        request_counter: Arc<dyn RequestCounter>,
    ) -> Self {
        Self {
            registry,
            aggregator,
            request_counter,
            next: None,
        }
    }

    pub fn with_next(mut self, next: Arc<dyn DnsHandler>) -> Self {
        self.next = Some(next);
        self
    }

    /// The handler holds no state that needs warming up.
    pub fn ready(&self) -> bool {
        true
    }

    /// Runs every stage up to, but not including, the reply.
    pub async fn resolve(&self, request: &Message) -> Result<ResolvedAddress, DomainError> {
        let domain = QueryExtractor::extract(request)?;

        let resolution = self.registry.lookup(&domain).await.inspect_err(|e| {
            error!(domain = %domain, error = %e, "Registry lookup failed");
        })?;

        debug!(
            npub = %resolution.identity,
            relays = %resolution.relays.join(","),
            "Name resolved"
        );

        let author = PublicKey::from_npub(&resolution.identity).inspect_err(|e| {
            error!(domain = %domain, error = %e, "Invalid npub");
        })?;

        let address = self
            .aggregator
            .execute(&resolution.identity, author, &resolution.relays)
            .await?;

        info!(domain = %domain, ip = %address.ip, observed_at = address.observed_at, "Resolved ip");
        Ok(address)
    }

    async fn next_or_failure(
        &self,
        ctx: &RequestContext,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        match &self.next {
            Some(next) => {
                let mut printer = ResponsePrinter { inner: writer };
                next.serve_dns(ctx, &mut printer, request).await
            }
            None => Err(DomainError::NoNextHandler(HANDLER_NAME)),
        }
    }
}

#[async_trait]
impl DnsHandler for HandleDnsQueryUseCase {
    async fn serve_dns(
        &self,
        ctx: &RequestContext,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.request_counter.increment(&ctx.server);

        match self.resolve(request).await {
            Ok(address) => ResponseBuilder::write_answer(writer, request, address.ip).await,
            Err(e) if e.is_fallthrough() => {
                warn!(
                    client = %ctx.client,
                    protocol = ctx.protocol,
                    error = %e,
                    "Falling through to next handler"
                );
                self.next_or_failure(ctx, writer, request).await
            }
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        HANDLER_NAME
    }
}

/// Logs replies written by the next handler on our behalf.
struct ResponsePrinter<'a> {
    inner: &'a mut dyn ResponseWriter,
}

#[async_trait]
impl ResponseWriter for ResponsePrinter<'_> {
    async fn write_msg(&mut self, response: &Message) -> Result<(), DomainError> {
        info!(
            handler = HANDLER_NAME,
            rcode = ?response.response_code(),
            answers = response.answers().len(),
            "Fallthrough response"
        );
        self.inner.write_msg(response).await
    }
}
