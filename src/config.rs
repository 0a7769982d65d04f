use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Service configuration, read from an optional TOML file.
///
/// Every section and field has a default, so an empty file (or no file) is
/// a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Upper bound on a single acquirer call. Unset means no bound.
    pub timeout_ms: Option<u64>,
    /// Artificial delay added by the mock acquirer.
    pub latency_ms: Option<u64>,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives. `RUST_LOG` takes precedence when set.
    pub filter: Option<String>,
    pub format: LogFormat,
}

impl Config {
    /// Loads the configuration from `path`, or the defaults if `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml_str(&raw)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| PaymentError::Config(e.to_string()))?;
        config.bind_addr()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|_| {
            PaymentError::Config(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            ))
        })
    }
}
