//! In-process peer with a scripted console.

use std::time::Duration;

use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};

use topic_peer::{run_session, Console, SessionSummary};
use topic_proto::transport::{connect, KeepaliveSettings, MAX_LINE_LEN};

/// A peer session connected to a [`super::TestBroker`].
pub struct TestPeer {
    operator: DuplexStream,
    console: Console,
    session: JoinHandle<SessionSummary>,
}

#[allow(dead_code)]
impl TestPeer {
    pub async fn connect(port: u16) -> anyhow::Result<Self> {
        let (reader, writer) =
            connect("127.0.0.1", port, &KeepaliveSettings::default(), MAX_LINE_LEN).await?;
        let (operator, console_in) = tokio::io::duplex(4096);
        let console = Console::capturing();
        let session = tokio::spawn(run_session(
            reader,
            writer,
            console_in,
            console.clone(),
            64,
        ));

        Ok(Self {
            operator,
            console,
            session,
        })
    }

    /// Type one line at the console.
    pub async fn type_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.operator.write_all(line.as_bytes()).await?;
        self.operator.write_all(b"\n").await?;
        self.operator.flush().await?;
        Ok(())
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Wait until the console shows `line`.
    pub async fn wait_for_console(&self, line: &str) -> anyhow::Result<()> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !self.console.contains(line) {
            if Instant::now() >= deadline {
                anyhow::bail!(
                    "console never showed {line:?}; got {:?}",
                    self.console.captured()
                );
            }
            sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }

    /// Wait for the session to end.
    pub async fn finish(self) -> anyhow::Result<SessionSummary> {
        Ok(timeout(Duration::from_secs(5), self.session).await??)
    }
}
