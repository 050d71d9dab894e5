//! Time abstraction for expiry decisions
//!
//! The store and the in-memory sweeper read time through [`Clock`], so
//! expiry behavior is testable without sleeping. Production code uses
//! [`SystemClock`]; tests drive a [`ManualClock`].

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current wall-clock time.
///
/// Consulted on every store operation, so implementations must be cheap.
pub trait Clock: Send + Sync {
    /// Current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and simulation.
///
/// Clones share the same instant, so a clock handed to a store and a backend
/// can still be advanced from the test body.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Clock frozen at `start` until advanced.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_stands_still() {
        let clock = ManualClock::new(Utc::now());

        assert_eq!(clock.now_utc(), clock.now_utc());
    }

    #[test]
    fn advance_moves_time_forward() {
        let start = Utc::now();
        let clock = ManualClock::new(start);

        clock.advance(TimeDelta::seconds(90));

        assert_eq!(clock.now_utc(), start + TimeDelta::seconds(90));
    }

    #[test]
    fn clones_share_the_same_instant() {
        let clock = ManualClock::new(Utc::now());
        let observer = clock.clone();

        clock.advance(TimeDelta::hours(1));

        assert_eq!(observer.now_utc(), clock.now_utc());
    }
}
