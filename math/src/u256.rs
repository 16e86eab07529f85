//! 256-bit unsigned integer for wide intermediates.

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer used for intermediate products.
    pub struct U256(4);
}

impl U256 {
    /// Convert back to `u128`, or `None` if the value does not fit.
    pub fn to_u128(&self) -> Option<u128> {
        if self.bits() <= 128 {
            Some(self.low_u128())
        } else {
            None
        }
    }
}
