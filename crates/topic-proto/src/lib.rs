//! # topic-proto
//!
//! Wire protocol for line-oriented topic brokers.
//!
//! Peers register against a single topic as a publisher or subscriber and then
//! exchange newline-terminated UTF-8 lines with the broker. This crate decodes
//! those lines once, at the transport boundary, into a small closed set of
//! variants:
//!
//! - [`Request`]: everything a peer may send to the broker
//! - [`ServerLine`]: either an inspection control signal or an opaque payload
//!
//! ## Features
//!
//! - Typed requests with exact wire rendering via [`std::fmt::Display`]
//! - Inspection control parsing that keeps the lenient boolean fallback observable
//! - Optional Tokio integration: [`LineCodec`] and framed read/write halves
//!
//! ## Quick Start
//!
//! ```rust
//! use topic_proto::{Request, Role, ServerLine};
//!
//! let register = Request::register(Role::Publisher, ["market", "news"]);
//! assert_eq!(register.to_string(), "publish market news");
//! assert_eq!(register.topic_name().as_deref(), Some("market_news"));
//!
//! match ServerLine::parse("IS_SERVER_INSPECTING true") {
//!     ServerLine::Inspecting(signal) => assert!(signal.active),
//!     ServerLine::Payload(_) => unreachable!(),
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod request;
pub mod server;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::error::ProtocolError;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::request::{Request, Role};
pub use self::server::{InspectSignal, ServerLine, INSPECTING_KEYWORD};
#[cfg(feature = "tokio")]
pub use self::transport::{LineReader, LineWriter, TransportReadError};
