//! Operator console input loop.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, instrument};

use crate::engine::Event;
use crate::lifecycle::{Lifecycle, ShutdownReason};
use crate::network::deliver;

/// Read operator lines and feed them to the engine.
///
/// End of input and read errors end the session with
/// [`ShutdownReason::ConsoleClosed`].
#[instrument(skip_all, name = "console")]
pub async fn run_input<R>(input: R, events: mpsc::Sender<Event>, lifecycle: Arc<Lifecycle>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = FramedRead::new(input, LinesCodec::new());

    loop {
        let next = tokio::select! {
            biased;
            _ = lifecycle.stopped() => break,
            next = lines.next() => next,
        };

        let event = match next {
            Some(Ok(line)) => Event::Input(line),
            Some(Err(e)) => Event::Shutdown(ShutdownReason::ConsoleClosed(e.to_string())),
            None => {
                debug!("console reached end of input");
                Event::Shutdown(ShutdownReason::ConsoleClosed("end of input".into()))
            }
        };

        if !deliver(&events, event, &lifecycle).await {
            break;
        }
    }
}
