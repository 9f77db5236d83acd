//! Time utilities and abstractions
//!
//! Wall-clock access goes through [`Clock`] so cache freshness and token
//! expiry can be tested without waiting. The mock implementation lives in
//! [`crate::testing`].

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn utc_now(&self) -> DateTime<Utc>;

    /// Milliseconds since the UNIX epoch
    fn millis_since_epoch(&self) -> i64 {
        self.utc_now().timestamp_millis()
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
