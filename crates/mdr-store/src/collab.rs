//! # Identity and Clock Collaborators
//!
//! Validation runs and ledger events are stamped with an actor and a UTC
//! timestamp. Both come from outside this subsystem, so both are traits:
//! production wires in the session identity and the system clock, tests
//! wire in fixed values and get fully deterministic output.

use mdr_core::{Actor, Timestamp};

/// UTC timestamp source.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// The system clock, truncated to seconds by [`Timestamp::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Source of the acting identity for `executed_by` / ledger stamping.
pub trait IdentitySource: Send + Sync {
    /// The actor on whose behalf the current operation runs.
    fn current_actor(&self) -> Actor;
}

/// An identity source that always returns the same actor.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Actor);

impl StaticIdentity {
    /// Identity with the given id and no email.
    pub fn named(id: impl Into<String>) -> Self {
        Self(Actor::from_id(id))
    }
}

impl IdentitySource for StaticIdentity {
    fn current_actor(&self) -> Actor {
        self.0.clone()
    }
}
