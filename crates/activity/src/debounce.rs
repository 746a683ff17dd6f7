//! Per-file throttling of activity events
//!
//! An event is accepted when the focused file changed since the last
//! accepted event, or when at least `min_interval` has passed since then.
//! Rejected events leave the state untouched.

use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Minimum time between two calls for the same file
pub const MIN_INTERVAL: Duration = Duration::from_millis(30_000);

/// Timing and identity of the last accepted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleState {
    /// Session start until the first acceptance
    last_invoked_at: Instant,
    /// None until the first acceptance
    last_file: Option<String>,
}

impl ThrottleState {
    pub fn new(started_at: Instant) -> Self {
        Self {
            last_invoked_at: started_at,
            last_file: None,
        }
    }

    pub fn last_invoked_at(&self) -> Instant {
        self.last_invoked_at
    }

    pub fn last_file(&self) -> Option<&str> {
        self.last_file.as_deref()
    }
}

/// Outcome of observing one activity event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Call the tool for `previous`, the file being left
    Accept { previous: Option<String> },
    /// Too soon for the same file
    Reject,
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }
}

/// Throttle for a single editor session
///
/// Owned by whoever receives events; the host delivers them one at a time,
/// so `observe` runs to completion before the next event is seen.
#[derive(Debug)]
pub struct ThrottlePolicy {
    min_interval: Duration,
    state: ThrottleState,
}

impl ThrottlePolicy {
    /// Start a session now
    pub fn new(min_interval: Duration) -> Self {
        Self::starting_at(min_interval, Instant::now())
    }

    /// Start a session at a given instant
    pub fn starting_at(min_interval: Duration, started_at: Instant) -> Self {
        Self {
            min_interval,
            state: ThrottleState::new(started_at),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn state(&self) -> &ThrottleState {
        &self.state
    }

    /// Observe an event for `file` at the current time
    pub fn observe(&mut self, file: &str) -> Decision {
        self.observe_at(file, Instant::now())
    }

    /// Observe an event for `file` at `now`
    ///
    /// An empty `file` is a valid identity like any other.
    pub fn observe_at(&mut self, file: &str, now: Instant) -> Decision {
        let changed = self.state.last_file.as_deref() != Some(file);
        let elapsed = now.saturating_duration_since(self.state.last_invoked_at);

        if !changed && elapsed < self.min_interval {
            trace!("Throttled {:?} ({:?} since last call)", file, elapsed);
            return Decision::Reject;
        }

        let previous = self.state.last_file.replace(file.to_string());
        // Never move backwards, even if handed an older instant
        self.state.last_invoked_at = self.state.last_invoked_at.max(now);

        Decision::Accept { previous }
    }
}
