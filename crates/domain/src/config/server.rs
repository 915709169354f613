use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub dns_port: u16,

    /// Port for the `/metrics` and `/ready` endpoints.
    pub metrics_port: u16,

    pub bind_address: String,

    /// Label attached to the request counter. Defaults to `dns://:<dns_port>`.
    #[serde(default)]
    pub server_name: Option<String>,
}

impl ServerConfig {
    pub fn server_label(&self) -> String {
        self.server_name
            .clone()
            .unwrap_or_else(|| format!("dns://:{}", self.dns_port))
    }

    /// Listen address on `port`. Accepts bare IPv4 and IPv6 literals.
    pub fn socket_addr(&self, port: u16) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!("invalid bind_address {:?}", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: 53,
            metrics_port: 9153,
            bind_address: "0.0.0.0".to_string(),
            server_name: None,
        }
    }
}
