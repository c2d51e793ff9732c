//! Requests a peer sends to the broker.

use std::fmt;

/// Registration role of a peer for its topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// May read and write messages in the topic.
    Publisher,
    /// May only read messages in the topic.
    Subscriber,
}

impl Role {
    /// Resolve a registration verb (`publish` / `subscribe`), ignoring ASCII case.
    pub fn from_verb(verb: &str) -> Option<Self> {
        if verb.eq_ignore_ascii_case("publish") {
            Some(Self::Publisher)
        } else if verb.eq_ignore_ascii_case("subscribe") {
            Some(Self::Subscriber)
        } else {
            None
        }
    }

    /// The command verb used to register with this role.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Publisher => "publish",
            Self::Subscriber => "subscribe",
        }
    }

    /// Human-readable role name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publisher => "publisher",
            Self::Subscriber => "subscriber",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-to-broker request.
///
/// `Display` renders the exact wire line (without line ending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `publish <words...>` or `subscribe <words...>`.
    ///
    /// The wire line is the verb as typed (any case) followed by the topic
    /// tokens joined with single spaces, i.e. the operator's line with its
    /// whitespace normalized.
    Register {
        /// Role being requested.
        role: Role,
        /// Registration verb exactly as typed.
        verb: String,
        /// Topic tokens as typed, in order.
        topic_words: Vec<String>,
    },
    /// Message text for the registered topic. Sent bare, without a verb.
    Send(String),
    /// `list`: messages this publisher sent in the topic.
    List,
    /// `listall`: all messages in the topic.
    ListAll,
    /// `show`: available topics.
    Show,
    /// `quit`: disconnect.
    Quit,
}

impl Request {
    /// Build a registration request with the canonical lower-case verb.
    pub fn register<I, S>(role: Role, topic_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::register_with_verb(role, role.verb(), topic_words)
    }

    /// Build a registration request that keeps the verb as the operator typed
    /// it, e.g. `PUBLISH`.
    pub fn register_with_verb<I, S>(role: Role, verb: impl Into<String>, topic_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Register {
            role,
            verb: verb.into(),
            topic_words: topic_words.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a send request from message text.
    pub fn send(text: impl Into<String>) -> Self {
        Self::Send(text.into())
    }

    /// Topic name a registration resolves to: tokens joined with underscores.
    pub fn topic_name(&self) -> Option<String> {
        match self {
            Self::Register { topic_words, .. } => Some(topic_words.join("_")),
            _ => None,
        }
    }

    /// Short command name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { role, .. } => role.verb(),
            Self::Send(_) => "send",
            Self::List => "list",
            Self::ListAll => "listall",
            Self::Show => "show",
            Self::Quit => "quit",
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register {
                verb, topic_words, ..
            } => write!(f, "{} {}", verb, topic_words.join(" ")),
            Self::Send(text) => f.write_str(text),
            Self::List => f.write_str("list"),
            Self::ListAll => f.write_str("listall"),
            Self::Show => f.write_str("show"),
            Self::Quit => f.write_str("quit"),
        }
    }
}
