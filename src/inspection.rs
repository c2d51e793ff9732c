//! Broker inspection mode.
//!
//! The flag is owned by the engine and only changes when an
//! `IS_SERVER_INSPECTING` control line arrives.

use topic_proto::InspectSignal;
use tracing::{debug, warn};

/// Effect of one control signal on the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// false → true
    Entered,
    /// true → false; the backlog must be replayed.
    Exited,
    Unchanged,
}

#[derive(Debug, Default)]
pub struct InspectionMode {
    active: bool,
}

impl InspectionMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply a control signal and report the transition.
    ///
    /// A value other than `true`/`false` has already been coerced to `false`
    /// by the parser; that is kept, but logged.
    pub fn apply(&mut self, signal: InspectSignal) -> Transition {
        if signal.coerced {
            warn!(
                previous = self.active,
                "malformed inspection value coerced to false"
            );
        }

        let previous = std::mem::replace(&mut self.active, signal.active);
        let transition = match (previous, signal.active) {
            (false, true) => Transition::Entered,
            (true, false) => Transition::Exited,
            _ => Transition::Unchanged,
        };
        debug!(active = signal.active, ?transition, "inspection signal");
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut mode = InspectionMode::new();
        assert!(!mode.is_active());

        assert_eq!(mode.apply(InspectSignal::new(false)), Transition::Unchanged);
        assert_eq!(mode.apply(InspectSignal::new(true)), Transition::Entered);
        assert_eq!(mode.apply(InspectSignal::new(true)), Transition::Unchanged);
        assert!(mode.is_active());
        assert_eq!(mode.apply(InspectSignal::new(false)), Transition::Exited);
        assert_eq!(mode.apply(InspectSignal::new(false)), Transition::Unchanged);
    }

    #[test]
    fn test_garbage_value_ends_inspection() {
        let mut mode = InspectionMode::new();
        mode.apply(InspectSignal::new(true));

        let signal = InspectSignal::from_token(Some("garbage"));
        assert!(signal.coerced);
        assert_eq!(mode.apply(signal), Transition::Exited);
        assert!(!mode.is_active());
    }
}
