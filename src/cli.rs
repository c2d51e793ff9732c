//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

/// Line-oriented topic broker peer.
#[derive(Debug, Parser)]
#[command(name = "topic-peer")]
#[command(about = "Publish to or subscribe to a topic on a line-oriented broker")]
#[command(version)]
pub struct Cli {
    /// Broker host name or address
    pub host: Option<String>,

    /// Broker port
    pub port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the config file, if any, and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(host) = &self.host {
            config.connection.host = Some(host.clone());
        }
        if let Some(port) = self.port {
            config.connection.port = Some(port);
        }

        config.validate()?;
        Ok(config)
    }
}
