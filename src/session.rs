//! Registration state for the session.
//!
//! A peer registers exactly once, as publisher or subscriber of one topic.
//! The registration is stored in a `OnceLock`, so the write is published
//! atomically and can never be replaced.

use std::sync::OnceLock;

use topic_proto::Role;

use crate::error::CommandError;

/// The one-time registration of this peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub role: Role,
    /// Topic name, tokens joined with underscores.
    pub topic: String,
}

/// Per-process session state.
#[derive(Debug, Default)]
pub struct Session {
    registration: OnceLock<Registration>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.get()
    }

    pub fn role(&self) -> Option<Role> {
        self.registration().map(|r| r.role)
    }

    pub fn is_registered(&self) -> bool {
        self.registration().is_some()
    }

    pub fn is_publisher(&self) -> bool {
        self.role() == Some(Role::Publisher)
    }

    /// Record the registration. Fails with [`CommandError::AlreadyRegistered`]
    /// if one exists, leaving it untouched.
    pub fn register(
        &self,
        role: Role,
        topic: impl Into<String>,
    ) -> Result<&Registration, CommandError> {
        let mut fresh = false;
        let current = self.registration.get_or_init(|| {
            fresh = true;
            Registration {
                role,
                topic: topic.into(),
            }
        });

        if fresh {
            Ok(current)
        } else {
            Err(already_registered(current))
        }
    }

    /// Error describing the existing registration, if any.
    pub fn check_unregistered(&self) -> Result<(), CommandError> {
        match self.registration() {
            Some(existing) => Err(already_registered(existing)),
            None => Ok(()),
        }
    }
}

fn already_registered(existing: &Registration) -> CommandError {
    CommandError::AlreadyRegistered {
        role: existing.role,
        topic: existing.topic.clone(),
    }
}
