//! topic-peer - publish/subscribe peer for line-oriented topic brokers.
//!
//! A peer registers once as publisher or subscriber of a topic, sends and
//! receives text lines, and defers `send`/`list`/`listall` while the broker
//! announces inspection mode, replaying them (writes first, reads last) when
//! inspection ends.
//!
//! The console loop and the broker listener feed one [`engine::Engine`] task
//! through a bounded queue; the engine owns all peer state.

pub mod backlog;
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod input;
pub mod inspection;
pub mod lifecycle;
pub mod network;
pub mod peer;
pub mod session;
pub mod telemetry;

pub use crate::config::Config;
pub use crate::console::Console;
pub use crate::engine::{Engine, EngineStats, Event};
pub use crate::lifecycle::{Lifecycle, ShutdownReason};
pub use crate::peer::{SessionSummary, run_session};
