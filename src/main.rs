//! topic-peer - interactive topic broker peer.

use std::time::Duration;

use clap::Parser;
use tracing::info;

use topic_peer::cli::Cli;
use topic_peer::{peer, telemetry};

/// Grace period for blocking work (the stdin reader) at exit.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    telemetry::init_logging(&config.logging, cli.verbose);

    let Some((host, port)) = config.connection.target() else {
        eprintln!("> Usage: topic-peer <hostname> <port>");
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let summary = runtime.block_on(peer::run(&config, host, port));
    if let Some(summary) = summary {
        info!(reason = ?summary.reason, stats = ?summary.stats, "exiting");
    }

    // A console read still parked in a blocking thread must not hold the
    // process open.
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    Ok(())
}
