//! Controllable clock for deterministic tests
//!
//! ```ignore
//! use chrono::Duration;
//!
//! use gcontacts_common::testing::MockClock;
//! use gcontacts_common::time::Clock;
//!
//! let clock = MockClock::new();
//! let start = clock.utc_now();
//! clock.advance(Duration::minutes(31));
//! assert_eq!(clock.utc_now() - start, Duration::minutes(31));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::time::Clock;

/// Mock clock whose time only moves when told to.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a clock frozen at the current real time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Simulate time passing without actually waiting.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += duration;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn utc_now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
