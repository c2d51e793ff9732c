//! Broker-facing tasks.
//!
//! ```text
//!   broker ──► LineReader ──► run_listener ──► Event::Server ──┐
//!                                                              ▼
//!                                                           Engine
//!                                                              │
//!   broker ◄── LineWriter ◄── run_writer ◄──── Request ◄───────┘
//! ```
//!
//! Neither task touches peer state. The listener only decodes and forwards;
//! the writer only serializes what the engine hands it.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace, warn};

use topic_proto::transport::{LineReader, LineWriter};
use topic_proto::Request;

use crate::console::Console;
use crate::engine::Event;
use crate::error::SessionError;
use crate::lifecycle::{Lifecycle, ShutdownReason};

/// Read broker lines and feed them to the engine until end of stream, a read
/// error, or shutdown.
#[instrument(skip_all, name = "listener")]
pub async fn run_listener<R>(
    mut reader: LineReader<R>,
    events: mpsc::Sender<Event>,
    lifecycle: Arc<Lifecycle>,
) where
    R: AsyncRead + Unpin,
{
    loop {
        let result = tokio::select! {
            biased;
            _ = lifecycle.stopped() => break,
            result = reader.read_line() => result,
        };

        let event = match result {
            Ok(Some(line)) => {
                trace!(line = %line, "received");
                Event::Server(line)
            }
            Ok(None) => {
                debug!("broker closed the connection");
                Event::Shutdown(ShutdownReason::EndOfStream)
            }
            Err(e) => {
                let err = SessionError::from(e);
                warn!(error = %err, "broker read failed");
                Event::Shutdown(ShutdownReason::Transport(err.to_string()))
            }
        };

        if !deliver(&events, event, &lifecycle).await {
            break;
        }
    }
}

/// Write requests in order until the engine drops its sender or a write fails.
#[instrument(skip_all, name = "writer")]
pub async fn run_writer<W>(
    mut writer: LineWriter<W>,
    mut requests: mpsc::Receiver<Request>,
    lifecycle: Arc<Lifecycle>,
    console: Console,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(request) = requests.recv().await {
        trace!(request = request.name(), "writing");
        if let Err(e) = writer.write_request(&request).await {
            let err = SessionError::from(e);
            warn!(request = request.name(), error = %err, "broker write failed");
            lifecycle.trigger_with_notice(ShutdownReason::Transport(err.to_string()), &console);
            return;
        }
    }

    if let Err(e) = writer.close().await {
        debug!(error = %e, "closing broker connection failed");
    }
}

/// Hand an event to the engine. Returns `false` when the producer should stop:
/// after a shutdown event, or when the engine is gone.
pub(crate) async fn deliver(
    events: &mpsc::Sender<Event>,
    event: Event,
    lifecycle: &Lifecycle,
) -> bool {
    let last = matches!(event, Event::Shutdown(_));
    match events.send(event).await {
        Ok(()) => !last,
        Err(mpsc::error::SendError(event)) => {
            if let Event::Shutdown(reason) = event {
                lifecycle.trigger(reason);
            }
            false
        }
    }
}
