//! The dispatch engine.
//!
//! One task owns the session, the inspection flag and the backlog. The console
//! loop and the broker listener only produce [`Event`]s; everything that reads
//! or mutates peer state happens here, one event at a time. A backlog replay
//! triggered by the end of inspection runs to completion inside the handling
//! of that one control line, so no other input is looked at until it is done.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, instrument, trace, warn};

use topic_proto::transport::MAX_LINE_LEN;
use topic_proto::{Request, Role, ServerLine};

use crate::backlog::Backlog;
use crate::command::{Command, CommandKind};
use crate::console::Console;
use crate::error::{CommandError, DispatchError, DispatchResult, SessionError};
use crate::inspection::{InspectionMode, Transition};
use crate::lifecycle::{Lifecycle, ShutdownReason};
use crate::session::Session;
use crate::telemetry::{CommandTimer, spans};

/// Input to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A line typed by the operator.
    Input(String),
    /// A decoded line from the broker.
    Server(ServerLine),
    /// A producer hit end of input or an error.
    Shutdown(ShutdownReason),
}

/// Where a dispatched line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Console,
    Backlog,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Backlog => "backlog",
        }
    }
}

/// Counters kept for the lifetime of a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    /// Non-blank lines dispatched, from either origin.
    pub dispatched: u64,
    /// Requests handed to the writer.
    pub forwarded: u64,
    /// Lines deferred to the backlog.
    pub queued: u64,
    /// Backlog lines replayed.
    pub replayed: u64,
    /// Commands rejected locally.
    pub rejected: u64,
}

pub struct Engine {
    session: Session,
    inspection: InspectionMode,
    backlog: Backlog,
    outgoing: mpsc::Sender<Request>,
    console: Console,
    lifecycle: Arc<Lifecycle>,
    /// Longest wire line the broker connection carries.
    max_line_len: usize,
    stats: EngineStats,
}

impl Engine {
    pub fn new(outgoing: mpsc::Sender<Request>, console: Console, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            session: Session::new(),
            inspection: InspectionMode::new(),
            backlog: Backlog::new(),
            outgoing,
            console,
            lifecycle,
            max_line_len: MAX_LINE_LEN,
            stats: EngineStats::default(),
        }
    }

    /// Reject requests whose wire line is longer than `max_line_len` bytes.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_inspecting(&self) -> bool {
        self.inspection.is_active()
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Consume events until shutdown is requested or every producer is gone.
    ///
    /// Events still queued when shutdown is requested are discarded.
    #[instrument(skip_all, name = "engine")]
    pub async fn run(mut self, mut events: mpsc::Receiver<Event>) -> EngineStats {
        let lifecycle = Arc::clone(&self.lifecycle);

        loop {
            tokio::select! {
                biased;
                _ = lifecycle.stopped() => break,
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        debug!("all producers finished");
                        break;
                    }
                },
            }
        }

        let stats = self.stats;
        info!(
            dispatched = stats.dispatched,
            forwarded = stats.forwarded,
            queued = stats.queued,
            replayed = stats.replayed,
            rejected = stats.rejected,
            pending = self.backlog.len(),
            "engine stopped"
        );
        stats
    }

    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Input(line) => self.dispatch(&line, Origin::Console).await,
            Event::Server(line) => self.handle_server_line(line).await,
            Event::Shutdown(reason) => {
                self.lifecycle.trigger_with_notice(reason, &self.console);
            }
        }
    }

    async fn handle_server_line(&mut self, line: ServerLine) {
        match line {
            ServerLine::Payload(text) => self.console.line(text),
            ServerLine::Inspecting(signal) => {
                if self.inspection.apply(signal) == Transition::Exited {
                    self.flush_backlog().await;
                }
            }
        }
    }

    /// Replay everything deferred during inspection: writes first, reads last.
    async fn flush_backlog(&mut self) {
        if self.backlog.is_empty() {
            return;
        }

        let plan = self.backlog.drain_for_replay();
        info!(entries = plan.len(), "replaying backlog");

        self.console.line("--- COMMANDS TO BE EXECUTED ---");
        for (position, line) in plan.iter().enumerate() {
            self.console.line(format!("> {}: {}", position + 1, line));
        }
        self.console.blank();

        for line in plan {
            if !self.lifecycle.is_running() {
                debug!(line = %line, "session stopped, abandoning replay");
                break;
            }
            self.stats.replayed += 1;
            self.dispatch(&line, Origin::Backlog).await;
        }
    }

    /// Classify and execute one raw line, reporting any failure.
    pub async fn dispatch(&mut self, raw: &str, origin: Origin) {
        let Some(command) = Command::parse(raw) else {
            return;
        };
        self.stats.dispatched += 1;

        let span = spans::command(&command.name, origin.as_str());
        let _timer = CommandTimer::new(&command.name);
        let result = self.dispatch_command(raw, &command).instrument(span).await;

        match result {
            Ok(()) => {}
            Err(DispatchError::Command(err)) => {
                self.stats.rejected += 1;
                debug!(command = %command.name, code = err.error_code(), "command rejected");
                self.console.notice(err.to_string());
            }
            Err(DispatchError::Session(err)) => {
                warn!(command = %command.name, error = %err, "transport failure");
                self.lifecycle
                    .trigger_with_notice(ShutdownReason::Transport(err.to_string()), &self.console);
            }
        }
    }

    async fn dispatch_command(&mut self, raw: &str, command: &Command) -> DispatchResult {
        let kind = command.kind;

        if self.inspection.is_active() && kind.is_disabled_when_inspecting() {
            return self.defer(raw, command);
        }

        match kind {
            CommandKind::Help => {
                self.show_help();
                Ok(())
            }
            CommandKind::Show => self.forward(Request::Show).await,
            CommandKind::Send => self.send_message(command).await,
            CommandKind::List => self.forward(Request::List).await,
            CommandKind::ListAll => {
                if !self.session.is_registered() {
                    return Err(CommandError::TopicRequired.into());
                }
                self.forward(Request::ListAll).await
            }
            CommandKind::Quit => {
                self.forward(Request::Quit).await?;
                self.lifecycle.trigger(ShutdownReason::Quit);
                Ok(())
            }
            CommandKind::Register(role) => self.register(role, command).await,
            CommandKind::Unknown => Err(CommandError::UnknownCommand(command.name.clone()).into()),
        }
    }

    /// Queue a command that may not run while the broker is inspecting.
    fn defer(&mut self, raw: &str, command: &Command) -> DispatchResult {
        if command.kind.is_publisher_only() && !self.session.is_publisher() {
            let name = command.name.clone();
            return Err(match self.session.role() {
                Some(_) => CommandError::SubscriberForbidden(name),
                None => CommandError::PublisherRequired(name),
            }
            .into());
        }

        self.backlog.enqueue(raw);
        self.stats.queued += 1;
        debug!(command = %command.name, pending = self.backlog.len(), "deferred");

        if command.is_list_type() {
            self.console.notice(format!(
                "Command '{raw}' will execute last (to avoid data inconsistencies) when Inspect mode is ended."
            ));
        } else {
            self.console.notice(format!(
                "Command '{raw}' has been queued and will execute when Inspect mode is ended."
            ));
        }
        Ok(())
    }

    async fn send_message(&mut self, command: &Command) -> DispatchResult {
        match self.session.role() {
            None => return Err(CommandError::NotRegistered.into()),
            Some(Role::Subscriber) => return Err(CommandError::SubscriberCannotSend.into()),
            Some(Role::Publisher) => {}
        }

        let words = command.args();
        if words.is_empty() {
            return Err(CommandError::Usage("send <message>".into()).into());
        }

        self.forward(Request::send(words.join(" "))).await
    }

    async fn register(&mut self, role: Role, command: &Command) -> DispatchResult {
        self.session.check_unregistered()?;

        let words = command.args();
        if words.is_empty() {
            return Err(CommandError::Usage(format!("{} <topic_name>", command.tokens[0])).into());
        }

        let request =
            Request::register_with_verb(role, &command.tokens[0], words.iter().cloned());
        let topic = request.topic_name().unwrap_or_default();
        self.forward(request).await?;
        let registration = self.session.register(role, topic)?;
        info!(role = %registration.role, topic = %registration.topic, "registered");
        Ok(())
    }

    async fn forward(&mut self, request: Request) -> DispatchResult {
        let len = request.to_string().len();
        if len > self.max_line_len {
            return Err(CommandError::LineTooLong {
                actual: len,
                limit: self.max_line_len,
            }
            .into());
        }

        trace!(request = request.name(), "forwarding");
        self.outgoing
            .send(request)
            .await
            .map_err(|_| SessionError::OutgoingClosed)?;
        self.stats.forwarded += 1;
        Ok(())
    }

    fn show_help(&self) {
        for line in help_text(self.session.role(), self.inspection.is_active()) {
            self.console.line(line);
        }
    }
}

/// Help listing for the given role and inspection state.
///
/// Commands deferred during inspection are marked with `* `; the rest are
/// indented to line up.
pub fn help_text(role: Option<Role>, inspecting: bool) -> Vec<String> {
    let (mark, pad) = if inspecting { ("* ", "  ") } else { ("", "") };
    let mut lines = vec!["--- HELP: AVAILABLE COMMANDS ---".to_string()];

    match role {
        None => lines.push(
            "> [publish | subscribe] <topic>: Register as a publisher (read & write) or subscriber (read-only) for <topic>"
                .to_string(),
        ),
        Some(role) => {
            if role == Role::Publisher {
                lines.push(format!("{mark}> send <message>: Send a message to the server"));
                lines.push(format!("{mark}> list: List the messages you have sent in the topic"));
            }
            lines.push(format!("{mark}> listall: List all messages in the topic"));
        }
    }

    lines.push(format!("{pad}> show: Show available topics"));
    lines.push(format!("{pad}> quit: Disconnect from the server"));
    lines.push(String::new());

    if inspecting {
        lines.push("* Commands marked with an asterisk (*) are disabled during Inspect mode.".into());
        lines.push(
            "! N.B. Any usage of (*) will be queued and will execute once Inspect mode is ended."
                .into(),
        );
        lines.push(String::new());
    }

    lines
}
