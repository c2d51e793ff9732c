//! Session orchestration.
//!
//! Wires the broker halves and the operator console to the engine, waits for
//! the session to end, and tears everything down.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{Instrument, error, info, warn};

use topic_proto::transport::{self, LineReader, LineWriter};

use crate::config::Config;
use crate::console::Console;
use crate::engine::{Engine, EngineStats};
use crate::input::run_input;
use crate::lifecycle::{Lifecycle, ShutdownReason};
use crate::network::{run_listener, run_writer};
use crate::telemetry::spans;

/// How long teardown waits for queued requests (e.g. `quit`) to be written.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: Option<ShutdownReason>,
    pub stats: EngineStats,
}

/// Connect to the broker and run an interactive session on stdin/stdout.
///
/// Returns `None` if the broker could not be reached; the operator has
/// already been told.
pub async fn run(config: &Config, host: &str, port: u16) -> Option<SessionSummary> {
    let console = Console::Stdout;
    let connection = &config.connection;

    let (reader, writer) =
        match transport::connect(host, port, &connection.keepalive(), connection.max_line_len)
            .await
        {
            Ok(halves) => halves,
            Err(e) => {
                warn!(host = %host, port = port, error = %e, "connection failed");
                console.line("> Unable to connect to the server.");
                return None;
            }
        };

    if config.console.banner {
        console.line(format!("--- CONNECTED TO SERVER ON PORT {port} ---"));
        console.line("> Enter 'help' for a list of available commands.");
        console.blank();
    }

    let summary = run_session(
        reader,
        writer,
        tokio::io::stdin(),
        console,
        config.console.event_queue,
    )
    .instrument(spans::session(host, port))
    .await;

    Some(summary)
}

/// Run one session over already-connected halves until it shuts down.
///
/// `queue_depth` bounds both the event queue and the outgoing request queue.
pub async fn run_session<R, W, I>(
    reader: LineReader<R>,
    writer: LineWriter<W>,
    input: I,
    console: Console,
    queue_depth: usize,
) -> SessionSummary
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    I: AsyncRead + Unpin + Send + 'static,
{
    let lifecycle = Arc::new(Lifecycle::new());
    let (events_tx, events_rx) = mpsc::channel(queue_depth);
    let (requests_tx, requests_rx) = mpsc::channel(queue_depth);

    let engine = Engine::new(requests_tx, console.clone(), Arc::clone(&lifecycle))
        .with_max_line_len(reader.max_line_len());
    let engine_task = tokio::spawn(engine.run(events_rx).in_current_span());
    let writer_task = tokio::spawn(
        run_writer(writer, requests_rx, Arc::clone(&lifecycle), console.clone())
            .in_current_span(),
    );
    let listener_task = tokio::spawn(
        run_listener(reader, events_tx.clone(), Arc::clone(&lifecycle)).in_current_span(),
    );
    let input_task =
        tokio::spawn(run_input(input, events_tx, Arc::clone(&lifecycle)).in_current_span());

    // The engine returns once shutdown is requested; it owns the only
    // request sender, so the writer drains and stops after it.
    let stats = match engine_task.await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "engine task failed");
            lifecycle.trigger(ShutdownReason::Transport(format!("engine failure: {e}")));
            EngineStats::default()
        }
    };

    match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer_task).await {
        Ok(result) => {
            check_task("writer", result);
        }
        Err(_) => warn!("writer did not finish draining"),
    }
    // Both loops select on the lifecycle and exit on their own
    let (listener, input) = tokio::join!(listener_task, input_task);
    check_task("listener", listener);
    check_task("console", input);

    console.line("--- CLIENT SHUTDOWN ---");

    let reason = lifecycle.reason();
    info!(reason = ?reason, "session ended");
    SessionSummary { reason, stats }
}

/// Log a task that panicked or was cancelled. Returns whether it finished cleanly.
fn check_task(task: &'static str, result: Result<(), JoinError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(task, error = %e, "task failed");
            false
        }
    }
}
