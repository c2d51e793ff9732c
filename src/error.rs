//! Unified error handling for topic-peer.
//!
//! Two families of errors exist, and they never mix:
//! - [`CommandError`]: detected locally, reported to the operator, session continues
//! - [`SessionError`]: detected on the transport, always ends the session

use thiserror::Error;
use topic_proto::transport::TransportReadError;
use topic_proto::{ProtocolError, Role};

// ============================================================================
// Command Errors (local, recoverable)
// ============================================================================

/// Errors reported back to the operator while dispatching a command.
///
/// The `Display` text is the operator-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(String),

    #[error("You need to register as a publisher first.")]
    NotRegistered,

    #[error("You need to register for a topic first.")]
    TopicRequired,

    #[error("You are registered as a subscriber. You cannot send messages.")]
    SubscriberCannotSend,

    #[error("You cannot use the command '{0}' as a subscriber.")]
    SubscriberForbidden(String),

    #[error("You cannot use the command '{0}' before registering as a publisher.")]
    PublisherRequired(String),

    #[error("You have already registered as '{role}' for topic '{topic}'.")]
    AlreadyRegistered { role: Role, topic: String },

    #[error("Unknown command. Enter 'help' to see the list of available commands.")]
    UnknownCommand(String),

    #[error("Message too long: {actual} bytes (limit: {limit}).")]
    LineTooLong { actual: usize, limit: usize },
}

impl CommandError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::NotRegistered => "not_registered",
            Self::TopicRequired => "topic_required",
            Self::SubscriberCannotSend => "subscriber_cannot_send",
            Self::SubscriberForbidden(_) => "subscriber_forbidden",
            Self::PublisherRequired(_) => "publisher_required",
            Self::AlreadyRegistered { .. } => "already_registered",
            Self::UnknownCommand(_) => "unknown_command",
            Self::LineTooLong { .. } => "line_too_long",
        }
    }
}

// ============================================================================
// Session Errors (transport, fatal)
// ============================================================================

/// Transport failures. Every one of these terminates the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("outgoing queue closed")]
    OutgoingClosed,

    #[error("write failed: {0}")]
    Write(#[from] ProtocolError),

    #[error("{0}")]
    Read(#[from] TransportReadError),
}

/// Outcome of a failed dispatch: either the operator made a mistake or the
/// transport is gone.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type for command dispatch.
pub type DispatchResult = Result<(), DispatchError>;
