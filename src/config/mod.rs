//! Configuration loading and management.
//!
//! All sections are optional; missing keys take the values in [`defaults`].
//! Host and port normally come from the command line (see [`crate::cli`]).
//!
//! ```toml
//! [connection]
//! host = "localhost"
//! port = 4040
//! keepalive_secs = 120
//!
//! [console]
//! banner = true
//!
//! [logging]
//! filter = "topic_peer=debug"
//! ```

mod defaults;
mod validation;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use topic_proto::transport::KeepaliveSettings;

pub use validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Peer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Broker connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Broker host name or address.
    #[serde(default)]
    pub host: Option<String>,
    /// Broker port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Idle time before the first TCP keepalive probe.
    #[serde(default = "defaults::default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Interval between TCP keepalive probes.
    #[serde(default = "defaults::default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
    /// Longest broker line accepted, in bytes.
    #[serde(default = "defaults::default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            keepalive_secs: defaults::default_keepalive_secs(),
            keepalive_interval_secs: defaults::default_keepalive_interval_secs(),
            max_line_len: defaults::default_max_line_len(),
        }
    }
}

impl ConnectionConfig {
    /// Host and port, if both are known.
    pub fn target(&self) -> Option<(&str, u16)> {
        Some((self.host.as_deref()?, self.port?))
    }

    pub fn keepalive(&self) -> KeepaliveSettings {
        KeepaliveSettings {
            time: Duration::from_secs(self.keepalive_secs),
            interval: Duration::from_secs(self.keepalive_interval_secs),
        }
    }
}

/// Operator console settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Print the connection banner on startup.
    #[serde(default = "defaults::default_true")]
    pub banner: bool,
    /// Capacity of the event and outgoing request queues.
    #[serde(default = "defaults::default_event_queue")]
    pub event_queue: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            banner: true,
            event_queue: defaults::default_event_queue(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "defaults::default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: defaults::default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self).map_err(ConfigError::Invalid)
    }
}
