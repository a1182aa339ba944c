//! Cooperative time budgets.
//!
//! Solvers sample a [`Deadline`] inside their inner loops and stop as soon
//! as it reports expiry. There is no preemption: the overshoot past the
//! budget is bounded by the work done between two checks.

use std::time::{Duration, Instant};

/// A wall-clock budget started at construction time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tsp::budget::Deadline;
///
/// let unbounded = Deadline::start(None);
/// assert!(!unbounded.expired());
/// assert_eq!(unbounded.remaining(), None);
///
/// let generous = Deadline::start(Some(Duration::from_secs(3600)));
/// assert!(!generous.expired());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Starts a budget of `limit`, or an unbounded one for `None`.
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A budget that never expires.
    pub fn unbounded() -> Self {
        Self::start(None)
    }

    /// Returns `true` once the elapsed time exceeds the limit.
    pub fn expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.started.elapsed() > limit,
            None => false,
        }
    }

    /// Time spent since the budget started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before expiry. `None` for an unbounded budget.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }

    /// The configured limit.
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }
}
