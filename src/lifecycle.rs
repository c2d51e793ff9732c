//! Session lifecycle: the single shutdown signal shared by every task.
//!
//! `running` flips from `true` to `false` exactly once. The reason for the
//! flip is published on a watch channel so every loop, however late it starts
//! waiting, observes it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::console::Console;

/// Why the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The operator issued `quit`.
    Quit,
    /// The broker closed the connection.
    EndOfStream,
    /// Reading from or writing to the broker failed.
    Transport(String),
    /// The operator's console stopped producing input.
    ConsoleClosed(String),
}

impl ShutdownReason {
    /// Operator-visible notice for this reason, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Quit | Self::EndOfStream => None,
            Self::Transport(reason) => Some(format!("Connection lost: {reason}")),
            Self::ConsoleClosed(reason) => Some(format!("Error reading from console: {reason}")),
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit => f.write_str("quit"),
            Self::EndOfStream => f.write_str("end of stream"),
            Self::Transport(reason) => write!(f, "transport: {reason}"),
            Self::ConsoleClosed(reason) => write!(f, "console: {reason}"),
        }
    }
}

/// Shared shutdown state.
pub struct Lifecycle {
    running: AtomicBool,
    reason_tx: watch::Sender<Option<ShutdownReason>>,
}

impl Lifecycle {
    /// Create a running lifecycle.
    pub fn new() -> Self {
        let (reason_tx, _) = watch::channel(None);
        Self {
            running: AtomicBool::new(true),
            reason_tx,
        }
    }

    /// Whether shutdown has not been requested yet.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request shutdown. Returns `true` only for the call that actually
    /// stopped the session; later calls are no-ops.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        if self
            .running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(reason = %reason, "Shutdown already in progress");
            return false;
        }

        info!(reason = %reason, "Shutdown requested");
        self.reason_tx.send_replace(Some(reason));
        true
    }

    /// Request shutdown and show the reason's notice if this call won.
    pub fn trigger_with_notice(&self, reason: ShutdownReason, console: &Console) -> bool {
        let notice = reason.notice();
        let stopped = self.trigger(reason);
        if stopped && let Some(text) = notice {
            console.notice(text);
        }
        stopped
    }

    /// The reason the session stopped, once it has.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason_tx.borrow().clone()
    }

    /// Resolve once shutdown has been requested. Cancel-safe.
    pub async fn stopped(&self) {
        let mut rx = self.reason_tx.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(Option::is_some).await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
