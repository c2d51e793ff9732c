//! Transport error types.

use thiserror::Error;

use crate::error::ProtocolError;

/// Errors that can occur when reading from a transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportReadError {
    /// An I/O error occurred.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A protocol error occurred.
    #[error("transport protocol error: {0}")]
    Protocol(ProtocolError),
}

impl From<ProtocolError> for TransportReadError {
    fn from(err: ProtocolError) -> Self {
        // Codec I/O failures surface wrapped in ProtocolError; unwrap them so
        // callers can tell a broken socket from a malformed line.
        match err {
            ProtocolError::Io(io) => Self::Io(io),
            other => Self::Protocol(other),
        }
    }
}
