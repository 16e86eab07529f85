//! Pool ledger and per-staker stake account records.

use serde::{Deserialize, Serialize};
use tidelock_types::{PoolConfig, StakerId, Timestamp};

/// How many multiples of τ may elapse past `base_epoch` before operations
/// that mint a fresh maturity anchor must wait for a rebase sync. Keeps
/// `e^(age/τ)` anchor factors inside the safe fixed-point range.
pub const MAX_ANCHOR_AGE_RATIO: u64 = 40;

/// Who may update pool settings. Renouncing is terminal: a renounced pool
/// never has an authority again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authority {
    Holder(StakerId),
    Renounced,
}

impl Authority {
    pub fn is_renounced(&self) -> bool {
        matches!(self, Authority::Renounced)
    }
}

/// Aggregate state for one staking pool.
///
/// Mutated by every operation; never destroyed. All WAD-scaled fields use
/// the fixed-point conventions of `tidelock-math`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolLedger {
    /// Sum of all stake accounts' principal. Equals the vault balance.
    pub total_principal: u128,

    /// Reward accumulator, WAD-scaled native units per principal unit.
    /// Monotonically non-decreasing; advanced only by deposits and syncs,
    /// scaled by the maximum possible weight (total principal).
    pub acc_reward_per_weighted_share: u128,

    /// Custody balance at the last accounting event. The delta against the
    /// live balance is what reward sync distributes.
    pub last_observed_reward_balance: u64,

    /// Sum of all stake accounts' reward debt, WAD-scaled. Maintained
    /// incrementally; never recomputed by scanning accounts.
    pub aggregate_reward_debt: u128,

    /// Origin for maturity-anchor factors. Advanced by the rebase sync;
    /// accounts rescale lazily against it.
    pub base_epoch: Timestamp,

    /// τ plus the authority-tunable settings.
    pub config: PoolConfig,

    /// Settings authority.
    pub authority: Authority,
}

impl PoolLedger {
    pub fn new(config: PoolConfig, authority: StakerId, created_at: Timestamp) -> Self {
        Self {
            total_principal: 0,
            acc_reward_per_weighted_share: 0,
            last_observed_reward_balance: 0,
            aggregate_reward_debt: 0,
            base_epoch: created_at,
            config,
            authority: Authority::Holder(authority),
        }
    }

    pub fn tau_seconds(&self) -> u64 {
        self.config.tau_seconds
    }

    /// Whether fresh anchor factors would leave the safe exponent range,
    /// requiring a rebase sync first.
    pub fn needs_rebase(&self, now: Timestamp) -> bool {
        let age = self.base_epoch.elapsed_since(now);
        age > MAX_ANCHOR_AGE_RATIO.saturating_mul(self.config.tau_seconds)
    }
}

/// An outstanding unstake request (cooldown in progress).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeRequest {
    pub amount: u64,
    pub requested_at: Timestamp,
}

/// Per-staker state. Created on first stake; closeable only once principal
/// is zero and no unstake request is pending.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeAccount {
    /// Currently staked amount, native units.
    pub principal: u64,

    /// Blended maturity anchor: `e^((anchor_time − anchor_epoch)/τ)`,
    /// WAD-scaled. Together with `anchor_epoch` this encodes the stake's
    /// effective age origin; weight is always derived lazily from it.
    pub anchor_factor: u128,

    /// The pool `base_epoch` the anchor factor is relative to. Updated when
    /// a mutating operation rescales the factor after a rebase.
    pub anchor_epoch: Timestamp,

    /// WAD-scaled accumulator value already accounted against this
    /// principal at maximum weight.
    pub reward_debt: u128,

    /// WAD-scaled entitlement already settled (paid or credited). Reset
    /// when principal changes; the immature remainder moves into the debt.
    pub claimed_snapshot: u128,

    /// Total rewards ever paid to this account, native units. Audit
    /// counter; never decreases.
    pub cumulative_claimed: u64,

    /// At most one outstanding cooldown request. Principal changes are
    /// rejected while one is pending.
    pub unstake_request: Option<UnstakeRequest>,

    /// Last time principal increased; gates the lock duration.
    pub lock_anchor: Timestamp,
}

impl StakeAccount {
    pub fn has_pending_request(&self) -> bool {
        self.unstake_request.is_some()
    }

    /// Whether the account's backing storage may be reclaimed.
    pub fn is_closeable(&self) -> bool {
        self.principal == 0 && self.unstake_request.is_none()
    }
}
