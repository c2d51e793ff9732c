//! Command classification.
//!
//! Turns one operator line into a lower-cased command name, its tokens, and a
//! [`CommandKind`] carrying the two gating predicates. Pure: no session access.

use topic_proto::Role;

/// What an operator command is, independent of session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Show,
    Send,
    List,
    ListAll,
    Quit,
    Register(Role),
    Unknown,
}

impl CommandKind {
    /// Resolve an already lower-cased command name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "help" => Self::Help,
            "show" => Self::Show,
            "send" => Self::Send,
            "list" => Self::List,
            "listall" => Self::ListAll,
            "quit" => Self::Quit,
            other => Role::from_verb(other).map_or(Self::Unknown, Self::Register),
        }
    }

    /// Only publishers may run it.
    pub fn is_publisher_only(self) -> bool {
        matches!(self, Self::Send | Self::List)
    }

    /// Must be deferred while the broker is inspecting.
    pub fn is_disabled_when_inspecting(self) -> bool {
        matches!(self, Self::Send | Self::List | Self::ListAll)
    }
}

/// A tokenized operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// First token, lower-cased.
    pub name: String,
    /// All whitespace-separated tokens, as typed.
    pub tokens: Vec<String>,
    pub kind: CommandKind,
}

impl Command {
    /// Classify a raw line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
        let name = tokens.first()?.to_lowercase();
        let kind = CommandKind::from_name(&name);
        Some(Self { name, tokens, kind })
    }

    /// Tokens after the command name.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// Reads topic state (`list`, `listall`) and so replays last.
    pub fn is_list_type(&self) -> bool {
        self.name.starts_with("list")
    }
}

/// Whether a raw backlog line is a list-type read.
pub fn is_list_type(line: &str) -> bool {
    Command::parse(line).is_some_and(|c| c.is_list_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_dropped() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t  "), None);
    }

    #[test]
    fn test_name_is_lowercased_tokens_kept() {
        let cmd = Command::parse("  SEND  Hello   World ").unwrap();
        assert_eq!(cmd.name, "send");
        assert_eq!(cmd.tokens, vec!["SEND", "Hello", "World"]);
        assert_eq!(cmd.args(), &["Hello".to_string(), "World".to_string()]);
        assert_eq!(cmd.kind, CommandKind::Send);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CommandKind::from_name("help"), CommandKind::Help);
        assert_eq!(
            CommandKind::from_name("publish"),
            CommandKind::Register(Role::Publisher)
        );
        assert_eq!(
            CommandKind::from_name("subscribe"),
            CommandKind::Register(Role::Subscriber)
        );
        assert_eq!(CommandKind::from_name("lists"), CommandKind::Unknown);
    }

    #[test]
    fn test_gating_predicates() {
        use CommandKind::*;
        let publisher_only: Vec<_> = [Help, Show, Send, List, ListAll, Quit, Unknown]
            .into_iter()
            .filter(|k| k.is_publisher_only())
            .collect();
        assert_eq!(publisher_only, vec![Send, List]);

        let deferred: Vec<_> = [Help, Show, Send, List, ListAll, Quit, Unknown]
            .into_iter()
            .filter(|k| k.is_disabled_when_inspecting())
            .collect();
        assert_eq!(deferred, vec![Send, List, ListAll]);

        assert!(!Register(Role::Publisher).is_disabled_when_inspecting());
    }

    #[test]
    fn test_list_type_uses_normalized_name() {
        assert!(is_list_type("list"));
        assert!(is_list_type("  LISTALL"));
        assert!(!is_list_type("send list"));
        assert!(!is_list_type(""));
    }
}
