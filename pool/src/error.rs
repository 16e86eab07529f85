//! Engine errors.
//!
//! Validation errors are recoverable by the caller (retry with different
//! input or wait out a time condition). Arithmetic errors are always fatal
//! to the operation. Every error aborts the whole operation with no partial
//! state mutation.

use thiserror::Error;
use tidelock_math::MathError;
use tidelock_types::{ConfigError, PoolId, StakerId};

use crate::vault::TransferError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakingError {
    // ── Validation ───────────────────────────────────────────────────────
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("stake below pool minimum: minimum {minimum}, resulting stake {resulting}")]
    BelowMinimumStake { minimum: u64, resulting: u64 },

    #[error("insufficient stake: need {needed}, available {available}")]
    InsufficientStakeBalance { needed: u64, available: u64 },

    #[error("stake is locked for another {remaining_secs}s")]
    StakeLocked { remaining_secs: u64 },

    #[error("pool has an unstake cooldown; use request/complete unstake")]
    CooldownRequired,

    #[error("pool has no unstake cooldown; use direct unstake")]
    CooldownNotConfigured,

    #[error("cooldown has {remaining_secs}s remaining")]
    CooldownNotElapsed { remaining_secs: u64 },

    #[error("an unstake request is already pending")]
    PendingUnstakeRequestExists,

    #[error("no unstake request is pending")]
    NoPendingUnstakeRequest,

    #[error("nothing to claim")]
    NothingToClaim,

    #[error("caller is not the pool authority")]
    NotAuthority,

    #[error("pool authority has been renounced")]
    AuthorityRenounced,

    #[error(transparent)]
    Config(#[from] ConfigError),

    // ── State ────────────────────────────────────────────────────────────
    #[error("no stakers to attribute rewards to")]
    NoStakersToReward,

    #[error("no stake account for {0}")]
    StakeAccountNotFound(StakerId),

    #[error("stake account still holds principal or a pending request")]
    StakeAccountNotEmpty,

    #[error("pool requires a rebase sync before this operation")]
    PoolRequiresSync,

    #[error("pool {0} not found")]
    PoolNotFound(PoolId),

    #[error("pool {0} already exists")]
    PoolAlreadyExists(PoolId),

    // ── Arithmetic and transfers ─────────────────────────────────────────
    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}
