//! The two narrow capabilities the engine consumes from its surrounding
//! system: principal movement in and out of the pool vault, and
//! reward-currency movement in and out of pool custody.
//!
//! The engine always computes amounts before calling a capability and never
//! derives amounts from capability results, except for the read-only
//! custody probe used to detect side-channel deposits.
//!
//! Capability implementations participate in the surrounding atomic
//! transaction: when an operation returns an error, the collaborator rolls
//! back every capability effect the operation already performed.

use thiserror::Error;
use tidelock_types::{PoolId, StakerId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Moves staked-asset units between stakers and the pool vault.
pub trait PrincipalVault {
    /// Move `amount` principal from a staker into the pool vault.
    fn deposit_principal(
        &mut self,
        pool: &PoolId,
        from: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError>;

    /// Move `amount` principal from the pool vault back to a staker.
    fn withdraw_principal(
        &mut self,
        pool: &PoolId,
        to: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError>;
}

/// Moves reward currency between wallets and pool custody.
pub trait RewardCustody {
    /// Move `amount` reward currency from a depositor into pool custody.
    fn deposit_value(
        &mut self,
        pool: &PoolId,
        from: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError>;

    /// Move `amount` reward currency from pool custody to a recipient.
    fn withdraw_value(
        &mut self,
        pool: &PoolId,
        to: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError>;

    /// Read-only probe of the pool's custody balance; used by reward sync
    /// to detect value that arrived without a deposit operation.
    fn balance(&self, pool: &PoolId) -> u64;
}
