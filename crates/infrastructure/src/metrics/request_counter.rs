use bond_dns_application::ports::RequestCounter;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub const METRICS_NAMESPACE: &str = "coredns";
pub const METRICS_SUBSYSTEM: &str = "bond";

/// `coredns_bond_request_count_total{server}`
#[derive(Clone)]
pub struct PrometheusRequestCounter {
    requests: IntCounterVec,
}

impl PrometheusRequestCounter {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests = IntCounterVec::new(
            Opts::new("request_count_total", "Counter of requests made.")
                .namespace(METRICS_NAMESPACE)
                .subsystem(METRICS_SUBSYSTEM),
            &["server"],
        )?;
        registry.register(Box::new(requests.clone()))?;
        Ok(Self { requests })
    }

    pub fn get(&self, server: &str) -> u64 {
        self.requests.with_label_values(&[server]).get()
    }
}

impl RequestCounter for PrometheusRequestCounter {
    fn increment(&self, server: &str) {
        self.requests.with_label_values(&[server]).inc();
    }
}

/// Renders every metric in `registry` in the Prometheus text format.
pub fn render(registry: &Registry) -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
