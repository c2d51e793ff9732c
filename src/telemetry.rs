//! Logging setup, spans, and command timing.

use std::time::Instant;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. Logs go to stderr so stdout stays the
/// operator console. `RUST_LOG` overrides the configured filter.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let default_filter = if verbose { "debug" } else { config.filter.as_str() };

    // A second init (tests, embedding) keeps the existing subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Guard that logs how long a command took when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_us = self.start.elapsed().as_micros() as u64;
        debug!(command = %self.command, elapsed_us, "command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span covering a whole broker session.
    pub fn session(host: &str, port: u16) -> Span {
        info_span!("session", host = %host, port = port)
    }

    /// Span for one dispatched command. `origin` is `console` or `backlog`.
    pub fn command(name: &str, origin: &str) -> Span {
        debug_span!("command", name = %name, origin = %origin)
    }
}
