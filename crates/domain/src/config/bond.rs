use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::errors::ConfigError;

pub const DIRECTIVE_NAME: &str = "bond";

/// Registry lookup service address in `host:port` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryEndpoint {
    host: String,
    port: String,
}

impl RegistryEndpoint {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }
}

impl FromStr for RegistryEndpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidEndpoint(s.to_string());
        let (host, port) = split_host_port(s).ok_or_else(invalid)?;
        if host.is_empty() || port.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            host: host.to_string(),
            port: port.to_string(),
        })
    }
}

impl fmt::Display for RegistryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Splits `host:port` or `[v6-host]:port`. A bare host with more than one
/// colon must be bracketed.
fn split_host_port(s: &str) -> Option<(&str, &str)> {
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        let port = rest[end + 1..].strip_prefix(':')?;
        if host.contains('[') || host.contains(']') || port.contains(']') {
            return None;
        }
        return Some((host, port));
    }

    let idx = s.rfind(':')?;
    let (host, port) = (&s[..idx], &s[idx + 1..]);
    if host.contains(':') || host.contains('[') || host.contains(']') {
        return None;
    }
    Some((host, port))
}

/// A single `bond <host:port>` configuration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondDirective {
    pub endpoint: RegistryEndpoint,
}

impl BondDirective {
    /// Parses the directive arguments (everything after the directive name).
    /// Exactly one token is accepted.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        match args {
            [endpoint] => Ok(Self {
                endpoint: endpoint.as_ref().parse()?,
            }),
            _ => Err(ConfigError::ArgumentCount(DIRECTIVE_NAME.to_string())),
        }
    }
}

impl FromStr for BondDirective {
    type Err = ConfigError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(DIRECTIVE_NAME) => {}
            Some(other) => {
                return Err(ConfigError::Validation(format!(
                    "expected '{}' directive, got '{}'",
                    DIRECTIVE_NAME, other
                )))
            }
            None => return Err(ConfigError::ArgumentCount(DIRECTIVE_NAME.to_string())),
        }
        let args: Vec<&str> = tokens.collect();
        Self::from_args(&args)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BondConfig {
    /// Full directive line, e.g. `bond registry.local:8080`.
    #[serde(default)]
    pub directive: Option<String>,

    /// Registry endpoint given directly as `host:port`.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_relay_timeout_secs")]
    pub relay_timeout_secs: u64,

    #[serde(default = "default_relay_limit")]
    pub relay_limit: usize,

    #[serde(default = "default_registry_timeout_secs")]
    pub registry_timeout_secs: u64,
}

impl BondConfig {
    pub fn registry_endpoint(&self) -> Result<RegistryEndpoint, ConfigError> {
        match (&self.directive, &self.endpoint) {
            (Some(line), None) => Ok(line.parse::<BondDirective>()?.endpoint),
            (None, Some(endpoint)) => endpoint.parse(),
            (Some(_), Some(_)) => Err(ConfigError::Validation(
                "set either bond.directive or bond.endpoint, not both".to_string(),
            )),
            (None, None) => Err(ConfigError::ArgumentCount(DIRECTIVE_NAME.to_string())),
        }
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_secs)
    }

    pub fn registry_timeout(&self) -> Duration {
        Duration::from_secs(self.registry_timeout_secs)
    }
}

impl Default for BondConfig {
    fn default() -> Self {
        Self {
            directive: None,
            endpoint: None,
            relay_timeout_secs: default_relay_timeout_secs(),
            relay_limit: default_relay_limit(),
            registry_timeout_secs: default_registry_timeout_secs(),
        }
    }
}

fn default_relay_timeout_secs() -> u64 {
    5
}

fn default_relay_limit() -> usize {
    10
}

fn default_registry_timeout_secs() -> u64 {
    5
}
