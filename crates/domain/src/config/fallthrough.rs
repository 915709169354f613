use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::errors::ConfigError;

/// Where queries go when the bond handler cannot answer them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallthroughConfig {
    /// Upstream resolver (`ip:port`). Without one, fallthrough answers SERVFAIL.
    #[serde(default)]
    pub upstream: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl FallthroughConfig {
    pub fn upstream_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        self.upstream
            .as_deref()
            .map(|upstream| {
                upstream.parse::<SocketAddr>().map_err(|e| {
                    ConfigError::Validation(format!("Invalid upstream '{}': {}", upstream, e))
                })
            })
            .transpose()
    }
}

impl Default for FallthroughConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    2000
}
