//! Fake broker.
//!
//! Binds an ephemeral local port and lets the test read what the peer sends
//! and write whatever broker lines the scenario needs.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// A listening fake broker.
pub struct TestBroker {
    listener: TcpListener,
}

impl TestBroker {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_default()
    }

    /// Accept the next peer connection.
    pub async fn accept(&self) -> anyhow::Result<BrokerConn> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(BrokerConn {
            reader: BufReader::new(read_half),
            writer: Some(BufWriter::new(write_half)),
        })
    }
}

/// The broker side of one peer connection.
pub struct BrokerConn {
    reader: BufReader<OwnedReadHalf>,
    writer: Option<BufWriter<OwnedWriteHalf>>,
}

#[allow(dead_code)]
impl BrokerConn {
    /// Send one broker line.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("broker connection already closed"))?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Announce inspection mode.
    pub async fn inspecting(&mut self, value: &str) -> anyhow::Result<()> {
        self.send(&format!("IS_SERVER_INSPECTING {value}")).await
    }

    /// Receive one line from the peer.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive one line with a timeout. End of stream is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("peer closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Whether the peer closed its side within `dur`.
    pub async fn closed_within(&mut self, dur: Duration) -> bool {
        let mut line = String::new();
        matches!(
            timeout(dur, self.reader.read_line(&mut line)).await,
            Ok(Ok(0))
        )
    }

    /// Stop writing; the peer sees end of stream.
    pub async fn close(&mut self) -> anyhow::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.shutdown().await?;
        }
        Ok(())
    }
}
