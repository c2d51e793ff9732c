//! Framed line transport over any async byte stream.

use std::io;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};

use crate::error::ProtocolError;
use crate::line::LineCodec;
use crate::request::Request;
use crate::server::ServerLine;

use super::error::TransportReadError;

/// Read half of a TCP line transport.
pub type TcpLineReader = LineReader<OwnedReadHalf>;
/// Write half of a TCP line transport.
pub type TcpLineWriter = LineWriter<OwnedWriteHalf>;

/// TCP keepalive probe timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepaliveSettings {
    /// Idle time before the first probe.
    pub time: Duration,
    /// Interval between probes.
    pub interval: Duration,
}

impl Default for KeepaliveSettings {
    fn default() -> Self {
        Self {
            time: Duration::from_secs(120),
            interval: Duration::from_secs(30),
        }
    }
}

/// Reads broker lines and decodes them into [`ServerLine`]s.
pub struct LineReader<R> {
    framed: FramedRead<R, LineCodec>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Wrap a reader with the default line limit.
    pub fn new(reader: R) -> Self {
        Self::with_codec(reader, LineCodec::new())
    }

    /// Wrap a reader with a custom codec.
    pub fn with_codec(reader: R, codec: LineCodec) -> Self {
        Self {
            framed: FramedRead::new(reader, codec),
        }
    }

    /// Read the next raw line. `Ok(None)` means the peer closed the stream.
    pub async fn read_raw(&mut self) -> Result<Option<String>, TransportReadError> {
        match self.framed.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Read and decode the next line. `Ok(None)` means the peer closed the stream.
    pub async fn read_line(&mut self) -> Result<Option<ServerLine>, TransportReadError> {
        Ok(self.read_raw().await?.map(|line| ServerLine::parse(&line)))
    }

    /// Longest line this reader accepts, in bytes.
    pub fn max_line_len(&self) -> usize {
        self.framed.decoder().max_len()
    }
}

/// Writes [`Request`]s as wire lines.
pub struct LineWriter<W> {
    framed: FramedWrite<W, LineCodec>,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    /// Wrap a writer with the default line limit.
    pub fn new(writer: W) -> Self {
        Self::with_codec(writer, LineCodec::new())
    }

    /// Wrap a writer with a custom codec.
    pub fn with_codec(writer: W, codec: LineCodec) -> Self {
        Self {
            framed: FramedWrite::new(writer, codec),
        }
    }

    /// Encode and flush a request.
    pub async fn write_request(&mut self, request: &Request) -> Result<(), ProtocolError> {
        self.write_line(request.to_string()).await
    }

    /// Encode and flush a raw line.
    pub async fn write_line(&mut self, line: impl Into<String>) -> Result<(), ProtocolError> {
        self.framed.send(line.into()).await
    }

    /// Flush pending data and shut down the write direction.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        self.framed.close().await
    }
}

/// Connect to a broker and split the stream into line halves.
pub async fn connect(
    host: &str,
    port: u16,
    keepalive: &KeepaliveSettings,
    max_line_len: usize,
) -> io::Result<(TcpLineReader, TcpLineWriter)> {
    let stream = TcpStream::connect((host, port)).await?;
    debug!(host = %host, port = port, "TCP connection established");

    if let Err(e) = enable_keepalive(&stream, keepalive) {
        warn!("failed to enable TCP keepalive: {}", e);
    }

    let (read, write) = stream.into_split();
    Ok((
        LineReader::with_codec(read, LineCodec::with_max_len(max_line_len)),
        LineWriter::with_codec(write, LineCodec::with_max_len(max_line_len)),
    ))
}

fn enable_keepalive(stream: &TcpStream, settings: &KeepaliveSettings) -> io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(settings.time)
        .with_interval(settings.interval);

    sock.set_tcp_keepalive(&keepalive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::InspectSignal;
    use crate::Role;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_reader_decodes_lines() {
        let data: &[u8] = b"IS_SERVER_INSPECTING true\r\nwelcome to news\nIS_SERVER_INSPECTING nope";
        let mut reader = LineReader::new(data);

        assert_eq!(
            reader.read_line().await.unwrap(),
            Some(ServerLine::inspecting(true))
        );
        assert_eq!(
            reader.read_line().await.unwrap(),
            Some(ServerLine::Payload("welcome to news".to_string()))
        );
        assert_eq!(
            reader.read_line().await.unwrap(),
            Some(ServerLine::Inspecting(InspectSignal {
                active: false,
                coerced: true
            }))
        );
        assert_eq!(reader.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reader_skips_oversized_and_bad_bytes() {
        let data: &[u8] = b"0123456789\ncaf\xe9\nok\n";
        let mut reader = LineReader::with_codec(data, LineCodec::with_max_len(4));
        assert_eq!(reader.max_line_len(), 4);

        assert_eq!(
            reader.read_line().await.unwrap(),
            Some(ServerLine::Payload("caf\u{FFFD}".to_string()))
        );
        assert_eq!(
            reader.read_line().await.unwrap(),
            Some(ServerLine::Payload("ok".to_string()))
        );
        assert_eq!(reader.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_writer_refuses_oversized_request() {
        let (client, _server) = tokio::io::duplex(64);
        let mut writer = LineWriter::with_codec(client, LineCodec::with_max_len(8));

        let err = writer
            .write_request(&Request::send("y".repeat(9)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MessageTooLong { actual: 9, limit: 8 }));
    }

    #[tokio::test]
    async fn test_writer_emits_wire_lines() {
        let (client, mut server) = tokio::io::duplex(256);
        let mut writer = LineWriter::new(client);

        writer
            .write_request(&Request::register(Role::Publisher, ["news"]))
            .await
            .unwrap();
        writer.write_request(&Request::send("hi all")).await.unwrap();
        writer.write_request(&Request::Quit).await.unwrap();
        writer.close().await.unwrap();
        drop(writer);

        let mut received = String::new();
        server.read_to_string(&mut received).await.unwrap();
        assert_eq!(received, "publish news\nhi all\nquit\n");
    }
}
