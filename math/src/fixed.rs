//! Checked WAD-scaled multiply, divide and multiply-then-divide.

use crate::error::MathError;
use crate::u256::U256;

/// Scale factor: 10^18 (WAD).
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Checked addition.
pub fn add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

/// Checked subtraction.
pub fn sub(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}

/// `a * b / c` with a 256-bit intermediate product. The division truncates.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, MathError> {
    if c == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(MathError::Overflow)?;
    (product / U256::from(c))
        .to_u128()
        .ok_or(MathError::Overflow)
}

/// Multiply two WAD-scaled values: `a * b / WAD`.
pub fn wad_mul(a: u128, b: u128) -> Result<u128, MathError> {
    mul_div(a, b, WAD)
}

/// Divide two WAD-scaled values: `a * WAD / b`.
pub fn wad_div(a: u128, b: u128) -> Result<u128, MathError> {
    mul_div(a, WAD, b)
}
