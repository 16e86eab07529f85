//! Pool configuration: the maturity time constant plus the settings an
//! authority may tune after creation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum allowed maturity time constant.
///
/// A τ near zero would grant instant full maturity and defeat the
/// time-weighting entirely, so pool creation refuses anything shorter.
pub const MIN_TAU_SECONDS: u64 = 60;

/// Maximum lock duration: 365 days. Prevents an authority from trapping
/// stakers indefinitely.
pub const MAX_LOCK_DURATION_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Maximum unstake cooldown: 30 days.
pub const MAX_UNSTAKE_COOLDOWN_SECONDS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tau must be at least {MIN_TAU_SECONDS} seconds, got {0}")]
    TauTooSmall(u64),

    #[error("lock duration {0}s exceeds maximum {MAX_LOCK_DURATION_SECONDS}s")]
    LockTooLong(u64),

    #[error("unstake cooldown {0}s exceeds maximum {MAX_UNSTAKE_COOLDOWN_SECONDS}s")]
    CooldownTooLong(u64),
}

/// Configuration for a single staking pool.
///
/// `tau_seconds` is fixed at creation; the remaining settings are mutable by
/// the pool authority. Each optional setting is disabled when zero, so a
/// pool with all three at zero behaves like a plain legacy pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maturity time constant in seconds. Weight reaches ~63.2% of
    /// principal at age τ, ~95% at 3τ, ~99% at 5τ. Immutable.
    pub tau_seconds: u64,

    /// Minimum stake per account (native units). Zero disables the check.
    pub min_stake_amount: u64,

    /// Seconds a stake is locked after the last principal increase.
    /// Zero disables locking.
    pub lock_duration_seconds: u64,

    /// Seconds between an unstake request and its completion. Zero means
    /// direct unstaking with no cooldown.
    pub unstake_cooldown_seconds: u64,
}

impl PoolConfig {
    /// A pool with the given τ and every optional mechanism disabled.
    pub fn new(tau_seconds: u64) -> Self {
        Self {
            tau_seconds,
            min_stake_amount: 0,
            lock_duration_seconds: 0,
            unstake_cooldown_seconds: 0,
        }
    }

    /// Validate bounds on every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tau_seconds < MIN_TAU_SECONDS {
            return Err(ConfigError::TauTooSmall(self.tau_seconds));
        }
        if self.lock_duration_seconds > MAX_LOCK_DURATION_SECONDS {
            return Err(ConfigError::LockTooLong(self.lock_duration_seconds));
        }
        if self.unstake_cooldown_seconds > MAX_UNSTAKE_COOLDOWN_SECONDS {
            return Err(ConfigError::CooldownTooLong(self.unstake_cooldown_seconds));
        }
        Ok(())
    }
}
