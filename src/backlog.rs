//! Commands deferred while the broker is inspecting.
//!
//! The backlog is owned by the engine task, so `enqueue` and the drain done by
//! a flush can never interleave.

use crate::command::is_list_type;

/// Raw command lines in arrival order.
#[derive(Debug, Default)]
pub struct Backlog {
    entries: Vec<String>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw line in observed order.
    pub fn enqueue(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Empty the backlog and return its lines in replay order.
    ///
    /// Stable partition: every non-list line keeps its relative order and
    /// comes first, then every list-type line in its relative order. The
    /// backlog is empty afterwards no matter what happens during replay.
    pub fn drain_for_replay(&mut self) -> Vec<String> {
        let (reads, mut plan): (Vec<String>, Vec<String>) =
            std::mem::take(&mut self.entries)
                .into_iter()
                .partition(|line| is_list_type(line));
        plan.extend(reads);
        plan
    }
}
