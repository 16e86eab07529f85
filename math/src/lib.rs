//! WAD fixed-point arithmetic for the Tidelock staking ledger.
//!
//! All quantities that carry fractions are unsigned 128-bit magnitudes
//! scaled by `WAD = 10^18`. Intermediate products widen to 256 bits so that
//! `a * b / c` never overflows before the division. Every operation is
//! checked: overflow, underflow and undefined divisions surface as
//! [`MathError`], never as a silent wrap or saturation. Wraparound in this
//! ledger would create or destroy value.

pub mod error;
pub mod exp;
pub mod fixed;
pub mod u256;

pub use error::MathError;
pub use exp::{exp_neg_time_ratio, exp_neg_wad, exp_time_ratio, exp_wad, EXP_INPUT_LIMIT_WAD};
pub use fixed::{add, mul_div, sub, wad_div, wad_mul, WAD};
pub use u256::U256;
