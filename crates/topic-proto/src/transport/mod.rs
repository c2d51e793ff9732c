//! Async line transport.
//!
//! - [`LineReader`]: yields decoded [`ServerLine`]s from any `AsyncRead`
//! - [`LineWriter`]: writes [`Request`]s to any `AsyncWrite`
//! - [`connect`]: opens a TCP connection with keepalive and splits it into
//!   owned halves so reading and writing can live on different tasks
//!
//! ```ignore
//! use topic_proto::transport::{connect, KeepaliveSettings};
//! use topic_proto::Request;
//!
//! let (mut reader, mut writer) =
//!     connect("localhost", 4040, &KeepaliveSettings::default(), MAX_LINE_LEN).await?;
//! writer.write_request(&Request::Show).await?;
//! while let Some(line) = reader.read_line().await? {
//!     println!("{line}");
//! }
//! ```
//!
//! [`ServerLine`]: crate::ServerLine
//! [`Request`]: crate::Request

mod error;
mod framed;

pub use error::TransportReadError;
pub use framed::{
    connect, KeepaliveSettings, LineReader, LineWriter, TcpLineReader, TcpLineWriter,
};

/// Maximum line length in bytes, excluding the line ending.
pub const MAX_LINE_LEN: usize = 8191;
