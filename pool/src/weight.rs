//! Lazy maturity-weight evaluation.
//!
//! Weight is never stored: it changes continuously with time, so every read
//! derives it from `(principal, anchor factor, τ, now)`. The anchor factor
//! `f = e^((anchor_time − base_epoch)/τ)` lets the weight be written as
//!
//! `weight(t) = principal × (1 − e^(−(t − base_epoch)/τ) · f)`
//!
//! which equals `principal × (1 − e^(−age/τ))` for a single stake and stays
//! exact across restakes when `f` is blended as a principal-weighted
//! average (old principal keeps its maturity percentage, added principal
//! starts at zero).

use tidelock_math::{exp_neg_time_ratio, exp_time_ratio, wad_mul, MathError, U256, WAD};
use tidelock_types::Timestamp;

/// Anchor factor for principal staked right now: `e^((now − base_epoch)/τ)`.
pub fn fresh_anchor_factor(
    base_epoch: Timestamp,
    now: Timestamp,
    tau_seconds: u64,
) -> Result<u128, MathError> {
    exp_time_ratio(base_epoch.elapsed_since(now), tau_seconds)
}

/// Rescale a stored anchor factor to a later base epoch.
///
/// After a rebase the pool's `base_epoch` moves forward; a factor recorded
/// against an older epoch shrinks by `e^(−shift/τ)`. Pure; callers decide
/// whether to persist the result.
pub fn effective_anchor_factor(
    factor: u128,
    anchor_epoch: Timestamp,
    base_epoch: Timestamp,
    tau_seconds: u64,
) -> Result<u128, MathError> {
    if anchor_epoch == base_epoch {
        return Ok(factor);
    }
    let shift = anchor_epoch.elapsed_since(base_epoch);
    let decay = exp_neg_time_ratio(shift, tau_seconds)?;
    wad_mul(factor, decay)
}

/// WAD-scaled maturity fraction `1 − e^(−age/τ)` in `[0, WAD)`.
///
/// `factor` must already be effective against `base_epoch`.
pub fn maturity_fraction(
    factor: u128,
    base_epoch: Timestamp,
    now: Timestamp,
    tau_seconds: u64,
) -> Result<u128, MathError> {
    let base_decay = exp_neg_time_ratio(base_epoch.elapsed_since(now), tau_seconds)?;
    let decay = wad_mul(base_decay, factor)?;
    // Truncated exponentials keep decay at or below WAD; the saturation
    // only absorbs the age-zero equality case.
    Ok(WAD.saturating_sub(decay))
}

/// WAD-scaled weight: `principal × maturity`.
pub fn weighted_stake(principal: u64, maturity_wad: u128) -> u128 {
    // principal < 2^64 and maturity ≤ WAD < 2^60, so the product fits u128.
    (principal as u128) * maturity_wad
}

/// Blend anchor factors on a principal increase.
///
/// `f_new = (p_old·f_old + p_add·f_add) / (p_old + p_add)`. The weighted
/// average preserves the instantaneous weight of the old principal while
/// the added principal starts at zero maturity.
pub fn blend_anchor_factor(
    p_old: u64,
    f_old: u128,
    p_add: u64,
    f_add: u128,
) -> Result<u128, MathError> {
    let total = (p_old as u128) + (p_add as u128);
    if total == 0 {
        return Err(MathError::DivisionByZero);
    }
    let sum = U256::from(p_old) * U256::from(f_old) + U256::from(p_add) * U256::from(f_add);
    (sum / U256::from(total)).to_u128().ok_or(MathError::Overflow)
}
