//! Per-call deadlines
//!
//! Every store read and every commit is bounded by a [`Deadline`]. Callers
//! hand the engine a [`TimeoutFactory`] that mints a fresh deadline for each
//! operation, so a single slow call never eats into the budget of the next.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Point in time after which a store operation must not start
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Deadline {
            expires_at: Instant::now().checked_add(timeout),
        }
    }

    /// Deadline that never expires
    pub const fn never() -> Self {
        Deadline { expires_at: None }
    }

    /// True once the deadline has passed
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }

    /// Time left, or `None` for an unbounded deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::never()
    }
}

impl fmt::Debug for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remaining() {
            Some(left) => write!(f, "Deadline({}ms left)", left.as_millis()),
            None => write!(f, "Deadline(never)"),
        }
    }
}

/// Factory producing one deadline per operation
pub type TimeoutFactory = Arc<dyn Fn() -> Deadline + Send + Sync>;

/// Factory minting deadlines `timeout` after each call
pub fn timeout_factory(timeout: Duration) -> TimeoutFactory {
    Arc::new(move || Deadline::after(timeout))
}

/// Factory minting unbounded deadlines
pub fn no_timeout() -> TimeoutFactory {
    Arc::new(Deadline::never)
}
