//! Operator console output.
//!
//! Supports both direct printing to stdout and capturing for tests.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for operator-visible text.
/// Stdout prints immediately; Capturing buffers each line in memory.
#[derive(Clone)]
pub enum Console {
    Stdout,
    Capturing(Arc<Mutex<Vec<String>>>),
}

impl Console {
    /// A console that records output instead of printing it.
    pub fn capturing() -> Self {
        Self::Capturing(Arc::new(Mutex::new(Vec::new())))
    }

    /// Emit text verbatim. Embedded newlines produce separate lines.
    pub fn line(&self, text: impl AsRef<str>) {
        let text = text.as_ref();
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout has nowhere to report to
                let _ = writeln!(out, "{text}");
                let _ = out.flush();
            }
            Self::Capturing(buf) => {
                let mut guard = buf.lock();
                guard.extend(text.split('\n').map(str::to_owned));
            }
        }
    }

    /// Emit an empty line.
    pub fn blank(&self) {
        self.line("");
    }

    /// Emit a `> `-prefixed notice followed by an empty line.
    pub fn notice(&self, text: impl AsRef<str>) {
        self.line(format!("> {}", text.as_ref()));
        self.blank();
    }

    /// Snapshot of captured lines. Empty for stdout.
    pub fn captured(&self) -> Vec<String> {
        match self {
            Self::Stdout => Vec::new(),
            Self::Capturing(buf) => buf.lock().clone(),
        }
    }

    /// Whether any captured line equals `line`.
    pub fn contains(&self, line: &str) -> bool {
        match self {
            Self::Stdout => false,
            Self::Capturing(buf) => buf.lock().iter().any(|l| l == line),
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("Console::Stdout"),
            Self::Capturing(buf) => write!(f, "Console::Capturing({} lines)", buf.lock().len()),
        }
    }
}
