//! Injectable time source for staleness decisions.
//!
//! Cache freshness is judged against wall-clock time. Components take a
//! [`Clock`] instead of calling `Utc::now()` directly so tests can simulate
//! arbitrary cache ages without manipulating real file timestamps.

use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::sync::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a settable instant, for tests and simulations.
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock frozen at `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    /// Moves the clock to a new instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().expect("clock lock poisoned") = instant;
    }

    /// Advances the clock by a duration.
    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.instant.lock().expect("clock lock poisoned");
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().expect("clock lock poisoned")
    }
}
