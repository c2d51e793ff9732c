//! Lines received from the broker.
//!
//! The broker sends exactly one kind of control line,
//! `IS_SERVER_INSPECTING <true|false>`. Everything else is opaque payload to be
//! shown to the operator verbatim.

use std::fmt;

/// First token of the inspection control line.
pub const INSPECTING_KEYWORD: &str = "IS_SERVER_INSPECTING";

/// Decoded value of an inspection control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectSignal {
    /// Whether the broker reports inspection as active.
    pub active: bool,
    /// The value token was neither `true` nor `false` (or was missing) and
    /// fell back to `false`.
    pub coerced: bool,
}

impl InspectSignal {
    /// A well-formed signal.
    pub fn new(active: bool) -> Self {
        Self {
            active,
            coerced: false,
        }
    }

    /// Parse the value token with a lenient boolean: `true` (any ASCII case)
    /// is true, anything else is false.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("true") => Self::new(true),
            Some(t) if t.eq_ignore_ascii_case("false") => Self::new(false),
            _ => Self {
                active: false,
                coerced: true,
            },
        }
    }
}

/// A broker-to-client line, decoded once at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Inspection mode control signal.
    Inspecting(InspectSignal),
    /// Any other line; displayed verbatim.
    Payload(String),
}

impl ServerLine {
    /// Classify a received line.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some(INSPECTING_KEYWORD) {
            return Self::Inspecting(InspectSignal::from_token(tokens.next()));
        }
        Self::Payload(line.to_owned())
    }

    /// Control line announcing the given inspection state.
    pub fn inspecting(active: bool) -> Self {
        Self::Inspecting(InspectSignal::new(active))
    }
}

/// Renders a control line in canonical form and a payload verbatim.
impl fmt::Display for ServerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inspecting(signal) => write!(f, "{} {}", INSPECTING_KEYWORD, signal.active),
            Self::Payload(text) => f.write_str(text),
        }
    }
}
