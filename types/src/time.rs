//! Timestamp type used throughout the ledger.
//!
//! Timestamps are Unix epoch seconds (UTC). The engine never reads the
//! system clock itself; every operation takes the current time as an input
//! and treats it as fixed for the operation's duration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    /// Saturates to zero if `now` is earlier.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(duration_secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_backwards() {
        let t = Timestamp::new(100);
        assert_eq!(t.elapsed_since(Timestamp::new(150)), 50);
        assert_eq!(t.elapsed_since(Timestamp::new(50)), 0);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let t = Timestamp::new(100);
        assert!(!t.has_expired(10, Timestamp::new(109)));
        assert!(t.has_expired(10, Timestamp::new(110)));
        assert!(t.has_expired(10, Timestamp::new(111)));
    }
}
