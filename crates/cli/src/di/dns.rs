use bond_dns_application::ports::DnsHandler;
use bond_dns_application::use_cases::{
    AggregateRelayEventsUseCase, HandleDnsQueryUseCase, RelayQueryOptions,
};
use bond_dns_domain::{Config, EventKind};
use bond_dns_infrastructure::dns::{DnsServer, UpstreamForwarder};
use bond_dns_infrastructure::metrics::PrometheusRequestCounter;
use bond_dns_infrastructure::registry::HttpRegistryClient;
use bond_dns_infrastructure::relay::WebSocketRelayClient;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct DnsServices {
    pub server: Arc<DnsServer>,
    pub handler: Arc<HandleDnsQueryUseCase>,
    pub metrics: Arc<Registry>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let endpoint = config.bond.registry_endpoint()?;
        info!(registry = %endpoint, "Initializing bond handler");

        let metrics = Arc::new(Registry::new());
        let request_counter = PrometheusRequestCounter::new(&metrics)?;

        let registry = HttpRegistryClient::new(&endpoint, config.bond.registry_timeout())?;
        let aggregator = AggregateRelayEventsUseCase::new(
            Arc::new(WebSocketRelayClient::new()),
            RelayQueryOptions {
                limit: config.bond.relay_limit,
                timeout: config.bond.relay_timeout(),
                kind: EventKind::TEXT_NOTE,
            },
        );

        let mut handler = HandleDnsQueryUseCase::new(
            Arc::new(registry),
            Arc::new(aggregator),
            Arc::new(request_counter),
        );

        match config.fallthrough.upstream_addr()? {
            Some(upstream) => {
                info!(upstream = %upstream, "Fallthrough to upstream resolver");
                let forwarder = UpstreamForwarder::new(
                    upstream,
                    Duration::from_millis(config.fallthrough.timeout_ms),
                );
                handler = handler.with_next(Arc::new(forwarder));
            }
            None => {
                warn!("No upstream configured, unresolved names answer SERVFAIL");
            }
        }

        let handler = Arc::new(handler);
        let server = Arc::new(DnsServer::new(
            Arc::clone(&handler) as Arc<dyn DnsHandler>,
            config.server.server_label(),
        ));

        Ok(Self {
            server,
            handler,
            metrics,
        })
    }
}
