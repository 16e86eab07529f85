//! Fixed-point exponential via base-2 range reduction.
//!
//! `e^x = 2^(x/ln2) = 2^n · 2^f` with integer `n` and fractional `f`;
//! the fractional power comes from a 6-term Taylor expansion of
//! `e^(f·ln2)`. The truncated Taylor tail rounds the result down, which is
//! the direction the reward protocol requires wherever value is paid out.

use crate::error::MathError;
use crate::fixed::{wad_div, wad_mul, WAD};

/// ln(2) scaled by WAD: 0.693147180559945309…
pub const LN2_WAD: u128 = 693_147_180_559_945_309;

/// 1/ln(2) scaled by WAD: 1.442695040888963407…
pub const INV_LN2_WAD: u128 = 1_442_695_040_888_963_407;

/// e scaled by WAD: 2.718281828459045235…
pub const E_WAD: u128 = 2_718_281_828_459_045_235;

/// Largest accepted exponent input, scaled by WAD.
///
/// Beyond 42, `e^x · WAD` no longer has a meaningful u128 representation on
/// the positive side, and `e^(-x) · WAD` truncates to zero anyway
/// (ln(10^18) ≈ 41.45).
pub const EXP_INPUT_LIMIT_WAD: u128 = 42 * WAD;

/// `e^x` for WAD-scaled `x ≥ 0`, WAD-scaled result.
pub fn exp_wad(x: u128) -> Result<u128, MathError> {
    if x == 0 {
        return Ok(WAD);
    }
    if x > EXP_INPUT_LIMIT_WAD {
        return Err(MathError::Overflow);
    }

    // Convert to a base-2 exponent and split into integer and fraction.
    let x_div_ln2 = wad_mul(x, INV_LN2_WAD)?;
    let int_part = x_div_ln2 / WAD;
    let frac_part = x_div_ln2 % WAD;

    // 2^frac = e^(frac · ln2), with frac · ln2 < ln2.
    let f_ln2 = wad_mul(frac_part, LN2_WAD)?;
    let two_pow_frac = exp_taylor(f_ln2)?;

    // With x ≤ 42·WAD the integer part stays well under the shift width.
    let two_pow_int = 1u128
        .checked_shl(int_part as u32)
        .ok_or(MathError::Overflow)?;
    wad_mul(
        two_pow_int.checked_mul(WAD).ok_or(MathError::Overflow)?,
        two_pow_frac,
    )
}

/// `e^(-x)` for WAD-scaled `x ≥ 0`, WAD-scaled result.
///
/// Inputs past the representable range return zero (fully decayed) rather
/// than an error: the true value is below one WAD ulp there.
pub fn exp_neg_wad(x: u128) -> Result<u128, MathError> {
    if x == 0 {
        return Ok(WAD);
    }
    if x >= EXP_INPUT_LIMIT_WAD {
        return Ok(0);
    }
    wad_div(WAD, exp_wad(x)?)
}

/// 6-term Taylor series for `e^x`, valid for small WAD-scaled `x < ln2`.
fn exp_taylor(x: u128) -> Result<u128, MathError> {
    // Precomputed 1/n! scaled by WAD.
    const INV_FACTORIAL: [u128; 7] = [
        WAD,
        WAD,
        500_000_000_000_000_000,
        166_666_666_666_666_667,
        41_666_666_666_666_667,
        8_333_333_333_333_333,
        1_388_888_888_888_889,
    ];

    let mut result = WAD;
    let mut x_pow = x;
    for (i, inv_fact) in INV_FACTORIAL.iter().enumerate().skip(1) {
        let term = wad_mul(x_pow, *inv_fact)?;
        result = result.checked_add(term).ok_or(MathError::Overflow)?;
        if i < INV_FACTORIAL.len() - 1 {
            x_pow = wad_mul(x_pow, x)?;
        }
    }
    Ok(result)
}

/// `e^(age/τ)` for whole-second inputs, WAD-scaled result.
pub fn exp_time_ratio(age_secs: u64, tau_seconds: u64) -> Result<u128, MathError> {
    if tau_seconds == 0 {
        return Err(MathError::DivisionByZero);
    }
    if age_secs == 0 {
        return Ok(WAD);
    }
    let ratio = (age_secs as u128)
        .checked_mul(WAD)
        .ok_or(MathError::Overflow)?
        / (tau_seconds as u128);
    exp_wad(ratio)
}

/// `e^(-age/τ)` for whole-second inputs, WAD-scaled result.
pub fn exp_neg_time_ratio(age_secs: u64, tau_seconds: u64) -> Result<u128, MathError> {
    if tau_seconds == 0 {
        return Err(MathError::DivisionByZero);
    }
    if age_secs == 0 {
        return Ok(WAD);
    }
    let ratio = (age_secs as u128)
        .checked_mul(WAD)
        .ok_or(MathError::Overflow)?
        / (tau_seconds as u128);
    exp_neg_wad(ratio)
}
