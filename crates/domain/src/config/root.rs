use serde::{Deserialize, Serialize};

use super::bond::BondConfig;
use super::errors::ConfigError;
use super::fallthrough::FallthroughConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

const LOCAL_CONFIG_PATH: &str = "bond-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/bond-dns/config.toml";

/// Main configuration structure for Bond DNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Server configuration (ports, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Registry and relay settings for the bond handler
    #[serde(default)]
    pub bond: BondConfig,

    /// Next handler in the chain
    #[serde(default)]
    pub fallthrough: FallthroughConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. bond-dns.toml in current directory
    /// 3. /etc/bond-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.metrics_port {
            self.server.metrics_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(directive) = overrides.directive {
            self.bond.directive = Some(directive);
            self.bond.endpoint = None;
        }
        if let Some(upstream) = overrides.upstream {
            self.fallthrough.upstream = Some(upstream);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.server.socket_addr(self.server.dns_port)?;

        self.bond.registry_endpoint()?;

        if self.bond.relay_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "bond.relay_timeout_secs must be positive".to_string(),
            ));
        }

        if self.bond.relay_limit == 0 {
            return Err(ConfigError::Validation(
                "bond.relay_limit must be positive".to_string(),
            ));
        }

        self.fallthrough.upstream_addr()?;

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub bind_address: Option<String>,
    pub directive: Option<String>,
    pub upstream: Option<String>,
    pub log_level: Option<String>,
}
