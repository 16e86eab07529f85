//! The reward-accounting protocol over a single pool.
//!
//! Every operation follows the same shape: validate inputs, compute the
//! complete set of post-operation values with checked arithmetic, perform
//! any capability transfers, and only then commit, so an error at any
//! point leaves both the pool ledger and the stake account untouched.
//!
//! The engine assumes the surrounding system serializes operations per
//! pool (see [`crate::registry`]); it holds no locks of its own.

use std::collections::HashMap;

use tidelock_math::{self as math, mul_div, MathError, WAD};
use tidelock_types::{PoolConfig, PoolId, StakerId, Timestamp};

use crate::error::StakingError;
use crate::state::{Authority, PoolLedger, StakeAccount, UnstakeRequest};
use crate::vault::{PrincipalVault, RewardCustody};
use crate::weight;

/// Result of a stake operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeOutcome {
    /// The beneficiary's principal after the stake.
    pub new_principal: u64,
    /// Rewards auto-claimed and paid out while settling, native units.
    pub rewards_paid: u64,
}

/// Result of an unstake (direct or completed-after-cooldown).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakeOutcome {
    /// Principal returned to the staker.
    pub principal_returned: u64,
    /// Rewards auto-claimed and paid out while settling, native units.
    pub rewards_paid: u64,
    /// Principal left staked afterwards.
    pub remaining_principal: u64,
}

/// Read-only aggregate view of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub total_principal: u128,
    pub acc_reward_per_weighted_share: u128,
    pub aggregate_reward_debt: u128,
}

/// One staking pool: the ledger record plus its stake accounts.
#[derive(Debug)]
pub struct StakePool {
    id: PoolId,
    ledger: PoolLedger,
    accounts: HashMap<StakerId, StakeAccount>,
}

/// Everything a settlement needs, computed purely from stored state.
struct Settlement {
    /// Anchor factor rescaled to the current base epoch.
    factor_eff: u128,
    /// WAD-scaled maturity fraction at `now`.
    maturity_wad: u128,
    /// WAD-scaled claimable entitlement.
    pending_wad: u128,
    /// `pending_wad` floored to native units.
    paid: u64,
}

/// `principal × acc`, the WAD-scaled entitlement at maximum weight.
fn max_entitlement(principal: u64, acc: u128) -> Result<u128, MathError> {
    mul_div(principal as u128, acc, 1)
}

fn compute_settlement(
    ledger: &PoolLedger,
    acct: &StakeAccount,
    now: Timestamp,
) -> Result<Settlement, StakingError> {
    let tau = ledger.tau_seconds();
    let factor_eff =
        weight::effective_anchor_factor(acct.anchor_factor, acct.anchor_epoch, ledger.base_epoch, tau)?;
    let maturity_wad = weight::maturity_fraction(factor_eff, ledger.base_epoch, now, tau)?;
    let weighted = weight::weighted_stake(acct.principal, maturity_wad);
    let raw = mul_div(weighted, ledger.acc_reward_per_weighted_share, WAD)?;
    // Transient negatives from rounding clamp to zero.
    let pending_wad = raw
        .saturating_sub(acct.reward_debt)
        .saturating_sub(acct.claimed_snapshot);
    let paid = u64::try_from(pending_wad / WAD).map_err(|_| MathError::Overflow)?;
    Ok(Settlement {
        factor_eff,
        maturity_wad,
        pending_wad,
        paid,
    })
}

impl StakePool {
    /// Create a pool. τ and the optional settings are validated up front;
    /// the creator becomes the authority.
    pub fn new(
        id: PoolId,
        config: PoolConfig,
        creator: StakerId,
        now: Timestamp,
    ) -> Result<Self, StakingError> {
        config.validate()?;
        Ok(Self {
            id,
            ledger: PoolLedger::new(config, creator, now),
            accounts: HashMap::new(),
        })
    }

    /// Reassemble a pool from persisted records.
    pub(crate) fn from_parts(
        id: PoolId,
        ledger: PoolLedger,
        accounts: HashMap<StakerId, StakeAccount>,
    ) -> Self {
        Self { id, ledger, accounts }
    }

    pub fn id(&self) -> &PoolId {
        &self.id
    }

    pub fn ledger(&self) -> &PoolLedger {
        &self.ledger
    }

    pub fn account(&self, staker: &StakerId) -> Option<&StakeAccount> {
        self.accounts.get(staker)
    }

    pub(crate) fn accounts(&self) -> &HashMap<StakerId, StakeAccount> {
        &self.accounts
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            total_principal: self.ledger.total_principal,
            acc_reward_per_weighted_share: self.ledger.acc_reward_per_weighted_share,
            aggregate_reward_debt: self.ledger.aggregate_reward_debt,
        }
    }

    /// Whether stake operations must wait for [`StakePool::sync_pool`].
    pub fn needs_rebase(&self, now: Timestamp) -> bool {
        self.ledger.needs_rebase(now)
    }

    // ── Staking ──────────────────────────────────────────────────────────

    /// Stake `amount` for the caller's own account.
    pub fn stake(
        &mut self,
        staker: &StakerId,
        amount: u64,
        now: Timestamp,
        vault: &mut dyn PrincipalVault,
        custody: &mut dyn RewardCustody,
    ) -> Result<StakeOutcome, StakingError> {
        self.stake_for(staker, staker, amount, now, vault, custody)
    }

    /// Stake `amount` paid by `payer` for `beneficiary`'s account.
    pub fn stake_for(
        &mut self,
        payer: &StakerId,
        beneficiary: &StakerId,
        amount: u64,
        now: Timestamp,
        vault: &mut dyn PrincipalVault,
        custody: &mut dyn RewardCustody,
    ) -> Result<StakeOutcome, StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if self.ledger.needs_rebase(now) {
            return Err(StakingError::PoolRequiresSync);
        }
        let tau = self.ledger.tau_seconds();
        let acc = self.ledger.acc_reward_per_weighted_share;
        let minimum = self.ledger.config.min_stake_amount;
        let f_fresh = weight::fresh_anchor_factor(self.ledger.base_epoch, now, tau)?;

        if !self.accounts.contains_key(beneficiary) {
            if minimum > 0 && amount < minimum {
                return Err(StakingError::BelowMinimumStake {
                    minimum,
                    resulting: amount,
                });
            }
            let reward_debt = max_entitlement(amount, acc)?;
            let total_principal = math::add(self.ledger.total_principal, amount as u128)?;
            let aggregate_debt = math::add(self.ledger.aggregate_reward_debt, reward_debt)?;

            vault.deposit_principal(&self.id, payer, amount)?;

            self.accounts.insert(
                beneficiary.clone(),
                StakeAccount {
                    principal: amount,
                    anchor_factor: f_fresh,
                    anchor_epoch: self.ledger.base_epoch,
                    reward_debt,
                    claimed_snapshot: 0,
                    cumulative_claimed: 0,
                    unstake_request: None,
                    lock_anchor: now,
                },
            );
            self.ledger.total_principal = total_principal;
            self.ledger.aggregate_reward_debt = aggregate_debt;
            tracing::debug!(pool = %self.id, staker = %beneficiary, amount, "opened stake account");
            return Ok(StakeOutcome {
                new_principal: amount,
                rewards_paid: 0,
            });
        }

        let acct = self
            .accounts
            .get_mut(beneficiary)
            .ok_or_else(|| StakingError::StakeAccountNotFound(beneficiary.clone()))?;
        if acct.has_pending_request() {
            return Err(StakingError::PendingUnstakeRequestExists);
        }
        let new_total = acct
            .principal
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        if minimum > 0 && new_total < minimum {
            return Err(StakingError::BelowMinimumStake {
                minimum,
                resulting: new_total,
            });
        }

        let settled = compute_settlement(&self.ledger, acct, now)?;
        let snapshot_after = if settled.paid > 0 {
            math::add(acct.claimed_snapshot, settled.pending_wad)?
        } else {
            acct.claimed_snapshot
        };
        // Entitlement earned at maximum weight but not yet matured into a
        // claim. It stays with this account: the new debt is discounted by
        // it, so the blended position re-earns exactly this amount as the
        // old principal's maturity recovers.
        let immature = max_entitlement(acct.principal, acc)?
            .saturating_sub(acct.reward_debt)
            .saturating_sub(snapshot_after);
        let anchor_factor =
            weight::blend_anchor_factor(acct.principal, settled.factor_eff, amount, f_fresh)?;
        let reward_debt = math::sub(max_entitlement(new_total, acc)?, immature)?;
        let aggregate_debt = math::add(
            math::sub(self.ledger.aggregate_reward_debt, acct.reward_debt)?,
            reward_debt,
        )?;
        let total_principal = math::add(self.ledger.total_principal, amount as u128)?;
        let cumulative_claimed = acct
            .cumulative_claimed
            .checked_add(settled.paid)
            .ok_or(MathError::Overflow)?;

        vault.deposit_principal(&self.id, payer, amount)?;
        if settled.paid > 0 {
            custody.withdraw_value(&self.id, beneficiary, settled.paid)?;
        }

        acct.principal = new_total;
        acct.anchor_factor = anchor_factor;
        acct.anchor_epoch = self.ledger.base_epoch;
        acct.reward_debt = reward_debt;
        acct.claimed_snapshot = 0;
        acct.cumulative_claimed = cumulative_claimed;
        acct.lock_anchor = now;
        self.ledger.total_principal = total_principal;
        self.ledger.aggregate_reward_debt = aggregate_debt;
        self.ledger.last_observed_reward_balance = self
            .ledger
            .last_observed_reward_balance
            .saturating_sub(settled.paid);
        tracing::debug!(
            pool = %self.id,
            staker = %beneficiary,
            amount,
            auto_claimed = settled.paid,
            "added to stake"
        );
        Ok(StakeOutcome {
            new_principal: new_total,
            rewards_paid: settled.paid,
        })
    }

    // ── Unstaking ────────────────────────────────────────────────────────

    /// Direct unstake; only available when the pool has no cooldown.
    pub fn unstake(
        &mut self,
        staker: &StakerId,
        amount: u64,
        now: Timestamp,
        vault: &mut dyn PrincipalVault,
        custody: &mut dyn RewardCustody,
    ) -> Result<UnstakeOutcome, StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if self.ledger.config.unstake_cooldown_seconds > 0 {
            return Err(StakingError::CooldownRequired);
        }
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        if acct.has_pending_request() {
            return Err(StakingError::PendingUnstakeRequestExists);
        }
        if amount > acct.principal {
            return Err(StakingError::InsufficientStakeBalance {
                needed: amount,
                available: acct.principal,
            });
        }
        self.check_lock(acct, now)?;
        self.execute_unstake(staker, amount, now, vault, custody)
    }

    /// Start the cooldown for an unstake of `amount`. The principal keeps
    /// earning weight until completion.
    pub fn request_unstake(
        &mut self,
        staker: &StakerId,
        amount: u64,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if self.ledger.config.unstake_cooldown_seconds == 0 {
            return Err(StakingError::CooldownNotConfigured);
        }
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        if acct.has_pending_request() {
            return Err(StakingError::PendingUnstakeRequestExists);
        }
        if amount > acct.principal {
            return Err(StakingError::InsufficientStakeBalance {
                needed: amount,
                available: acct.principal,
            });
        }
        self.check_lock(acct, now)?;

        let acct = self
            .accounts
            .get_mut(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        acct.unstake_request = Some(UnstakeRequest {
            amount,
            requested_at: now,
        });
        tracing::debug!(pool = %self.id, staker = %staker, amount, "unstake requested");
        Ok(())
    }

    /// Complete a pending unstake request after the cooldown has elapsed.
    pub fn complete_unstake(
        &mut self,
        staker: &StakerId,
        now: Timestamp,
        vault: &mut dyn PrincipalVault,
        custody: &mut dyn RewardCustody,
    ) -> Result<UnstakeOutcome, StakingError> {
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        let request = acct
            .unstake_request
            .ok_or(StakingError::NoPendingUnstakeRequest)?;
        let cooldown = self.ledger.config.unstake_cooldown_seconds;
        let elapsed = request.requested_at.elapsed_since(now);
        if elapsed < cooldown {
            return Err(StakingError::CooldownNotElapsed {
                remaining_secs: cooldown - elapsed,
            });
        }
        self.execute_unstake(staker, request.amount, now, vault, custody)
    }

    /// Cancel a pending unstake request; returns the cancelled amount.
    pub fn cancel_unstake_request(&mut self, staker: &StakerId) -> Result<u64, StakingError> {
        let acct = self
            .accounts
            .get_mut(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        let request = acct
            .unstake_request
            .take()
            .ok_or(StakingError::NoPendingUnstakeRequest)?;
        tracing::debug!(pool = %self.id, staker = %staker, amount = request.amount, "unstake request cancelled");
        Ok(request.amount)
    }

    fn check_lock(&self, acct: &StakeAccount, now: Timestamp) -> Result<(), StakingError> {
        let lock = self.ledger.config.lock_duration_seconds;
        if lock > 0 {
            let elapsed = acct.lock_anchor.elapsed_since(now);
            if elapsed < lock {
                return Err(StakingError::StakeLocked {
                    remaining_secs: lock - elapsed,
                });
            }
        }
        Ok(())
    }

    /// Shared unstake core: settle, split the immature entitlement, reduce
    /// principal, return tokens. Callers have already validated the amount
    /// against the account.
    fn execute_unstake(
        &mut self,
        staker: &StakerId,
        amount: u64,
        now: Timestamp,
        vault: &mut dyn PrincipalVault,
        custody: &mut dyn RewardCustody,
    ) -> Result<UnstakeOutcome, StakingError> {
        let acc = self.ledger.acc_reward_per_weighted_share;
        let acct = self
            .accounts
            .get_mut(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        let p_old = acct.principal;
        let p_new = p_old.checked_sub(amount).ok_or(MathError::Underflow)?;

        let settled = compute_settlement(&self.ledger, acct, now)?;
        let snapshot_after = if settled.paid > 0 {
            math::add(acct.claimed_snapshot, settled.pending_wad)?
        } else {
            acct.claimed_snapshot
        };
        let immature = max_entitlement(p_old, acc)?
            .saturating_sub(acct.reward_debt)
            .saturating_sub(snapshot_after);
        // The remaining principal keeps its proportional share of the
        // immature entitlement; the departing portion's share goes back to
        // the pool for redistribution by the next reward sync. Keeping it
        // claimable would let a large stake-then-unstake bypass maturity.
        let kept = if p_new == 0 {
            0
        } else {
            mul_div(immature, p_new as u128, p_old as u128)?
        };
        let released_wad = math::sub(immature, kept)?;
        let released = u64::try_from(released_wad / WAD).map_err(|_| MathError::Overflow)?;
        let reward_debt = if p_new == 0 {
            0
        } else {
            math::sub(max_entitlement(p_new, acc)?, kept)?
        };
        let aggregate_debt = math::add(
            math::sub(self.ledger.aggregate_reward_debt, acct.reward_debt)?,
            reward_debt,
        )?;
        let total_principal = math::sub(self.ledger.total_principal, amount as u128)?;
        let cumulative_claimed = acct
            .cumulative_claimed
            .checked_add(settled.paid)
            .ok_or(MathError::Overflow)?;

        vault.withdraw_principal(&self.id, staker, amount)?;
        if settled.paid > 0 {
            custody.withdraw_value(&self.id, staker, settled.paid)?;
        }

        acct.principal = p_new;
        acct.anchor_factor = settled.factor_eff;
        acct.anchor_epoch = self.ledger.base_epoch;
        acct.reward_debt = reward_debt;
        acct.claimed_snapshot = 0;
        acct.cumulative_claimed = cumulative_claimed;
        acct.unstake_request = None;
        self.ledger.total_principal = total_principal;
        self.ledger.aggregate_reward_debt = aggregate_debt;
        self.ledger.last_observed_reward_balance = self
            .ledger
            .last_observed_reward_balance
            .saturating_sub(settled.paid)
            .saturating_sub(released);
        if released > 0 {
            tracing::debug!(pool = %self.id, staker = %staker, released, "returned immature rewards for redistribution");
        }
        tracing::debug!(
            pool = %self.id,
            staker = %staker,
            amount,
            auto_claimed = settled.paid,
            "unstaked"
        );
        Ok(UnstakeOutcome {
            principal_returned: amount,
            rewards_paid: settled.paid,
            remaining_principal: p_new,
        })
    }

    // ── Rewards ──────────────────────────────────────────────────────────

    /// Pay out everything currently claimable. `NothingToClaim` (recoverable)
    /// when the claimable amount floors to zero.
    pub fn claim_rewards(
        &mut self,
        staker: &StakerId,
        now: Timestamp,
        custody: &mut dyn RewardCustody,
    ) -> Result<u64, StakingError> {
        let acct = self
            .accounts
            .get_mut(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        let settled = compute_settlement(&self.ledger, acct, now)?;
        if settled.paid == 0 {
            return Err(StakingError::NothingToClaim);
        }
        // The snapshot advances by the full WAD-scaled entitlement, not a
        // reset to the raw value, so claims at different maturities always
        // converge to the same total.
        let claimed_snapshot = math::add(acct.claimed_snapshot, settled.pending_wad)?;
        let cumulative_claimed = acct
            .cumulative_claimed
            .checked_add(settled.paid)
            .ok_or(MathError::Overflow)?;

        custody.withdraw_value(&self.id, staker, settled.paid)?;

        acct.claimed_snapshot = claimed_snapshot;
        acct.cumulative_claimed = cumulative_claimed;
        acct.anchor_factor = settled.factor_eff;
        acct.anchor_epoch = self.ledger.base_epoch;
        self.ledger.last_observed_reward_balance = self
            .ledger
            .last_observed_reward_balance
            .saturating_sub(settled.paid);
        tracing::debug!(pool = %self.id, staker = %staker, amount = settled.paid, "claimed rewards");
        Ok(settled.paid)
    }

    /// Distribute a reward deposit across current stakers.
    pub fn deposit_rewards(
        &mut self,
        depositor: &StakerId,
        amount: u64,
        custody: &mut dyn RewardCustody,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if self.ledger.total_principal == 0 {
            return Err(StakingError::NoStakersToReward);
        }
        let per_unit = mul_div(amount as u128, WAD, self.ledger.total_principal)?;
        let acc = math::add(self.ledger.acc_reward_per_weighted_share, per_unit)?;
        let observed = self
            .ledger
            .last_observed_reward_balance
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;

        custody.deposit_value(&self.id, depositor, amount)?;

        self.ledger.acc_reward_per_weighted_share = acc;
        self.ledger.last_observed_reward_balance = observed;
        tracing::info!(pool = %self.id, amount, per_unit, "distributed reward deposit");
        Ok(())
    }

    /// Fold custody value that arrived outside `deposit_rewards` into the
    /// accumulator. Returns the newly distributed amount. A delta observed
    /// while the pool has no stakers stays unaccounted (and is therefore
    /// distributed once stakers exist), never burned.
    pub fn sync_rewards(&mut self, custody: &dyn RewardCustody) -> Result<u64, StakingError> {
        let balance = custody.balance(&self.id);
        let delta = balance.saturating_sub(self.ledger.last_observed_reward_balance);
        if delta == 0 || self.ledger.total_principal == 0 {
            return Ok(0);
        }
        let per_unit = mul_div(delta as u128, WAD, self.ledger.total_principal)?;
        let acc = math::add(self.ledger.acc_reward_per_weighted_share, per_unit)?;

        self.ledger.acc_reward_per_weighted_share = acc;
        self.ledger.last_observed_reward_balance = balance;
        tracing::info!(pool = %self.id, amount = delta, "distributed side-channel rewards");
        Ok(delta)
    }

    /// Rebase: advance the anchor origin so fresh stakes stay inside the
    /// safe exponent range. A pure representation change: accounts rescale
    /// lazily and no entitlement moves. Idempotent for a fixed `now`.
    pub fn sync_pool(&mut self, now: Timestamp) {
        if now.as_secs() <= self.ledger.base_epoch.as_secs() {
            return;
        }
        let previous = self.ledger.base_epoch;
        self.ledger.base_epoch = now;
        tracing::info!(pool = %self.id, from = %previous, to = %now, "rebased pool epoch");
    }

    // ── Administration ───────────────────────────────────────────────────

    fn require_authority(&self, caller: &StakerId) -> Result<(), StakingError> {
        match &self.ledger.authority {
            Authority::Renounced => Err(StakingError::AuthorityRenounced),
            Authority::Holder(holder) if holder != caller => Err(StakingError::NotAuthority),
            Authority::Holder(_) => Ok(()),
        }
    }

    /// Update the mutable pool settings. `None` leaves a field unchanged.
    pub fn update_settings(
        &mut self,
        caller: &StakerId,
        min_stake_amount: Option<u64>,
        lock_duration_seconds: Option<u64>,
        unstake_cooldown_seconds: Option<u64>,
    ) -> Result<(), StakingError> {
        self.require_authority(caller)?;
        let mut config = self.ledger.config.clone();
        if let Some(v) = min_stake_amount {
            config.min_stake_amount = v;
        }
        if let Some(v) = lock_duration_seconds {
            config.lock_duration_seconds = v;
        }
        if let Some(v) = unstake_cooldown_seconds {
            config.unstake_cooldown_seconds = v;
        }
        config.validate()?;
        self.ledger.config = config;
        tracing::info!(pool = %self.id, "updated pool settings");
        Ok(())
    }

    /// Hand the authority to another identity, or renounce it forever with
    /// `None`.
    pub fn transfer_authority(
        &mut self,
        caller: &StakerId,
        new_authority: Option<StakerId>,
    ) -> Result<(), StakingError> {
        self.require_authority(caller)?;
        match new_authority {
            Some(next) => {
                tracing::info!(pool = %self.id, to = %next, "transferred authority");
                self.ledger.authority = Authority::Holder(next);
            }
            None => {
                tracing::info!(pool = %self.id, "renounced authority");
                self.ledger.authority = Authority::Renounced;
            }
        }
        Ok(())
    }

    /// Reclaim the backing storage of an emptied stake account.
    pub fn close_stake_account(&mut self, staker: &StakerId) -> Result<(), StakingError> {
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        if !acct.is_closeable() {
            return Err(StakingError::StakeAccountNotEmpty);
        }
        self.accounts.remove(staker);
        tracing::debug!(pool = %self.id, staker = %staker, "closed stake account");
        Ok(())
    }

    // ── Read-only queries ────────────────────────────────────────────────

    /// Claimable rewards, native units, at `now`.
    pub fn pending_rewards(&self, staker: &StakerId, now: Timestamp) -> Result<u64, StakingError> {
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        Ok(compute_settlement(&self.ledger, acct, now)?.paid)
    }

    /// WAD-scaled maturity fraction in `[0, WAD)`.
    pub fn maturity(&self, staker: &StakerId, now: Timestamp) -> Result<u128, StakingError> {
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        Ok(compute_settlement(&self.ledger, acct, now)?.maturity_wad)
    }

    /// WAD-scaled weighted stake at `now`.
    pub fn weighted_stake(&self, staker: &StakerId, now: Timestamp) -> Result<u128, StakingError> {
        let acct = self
            .accounts
            .get(staker)
            .ok_or_else(|| StakingError::StakeAccountNotFound(staker.clone()))?;
        let settled = compute_settlement(&self.ledger, acct, now)?;
        Ok(weight::weighted_stake(acct.principal, settled.maturity_wad))
    }
}
