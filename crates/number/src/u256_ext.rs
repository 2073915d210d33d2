//! Extension trait for U256 arithmetic operations.

use alloy::primitives::U256;

/// Extension trait for U256 to add utility methods.
pub trait U256Ext: Sized {
    /// Ceiling division: (self + other - 1) / other
    fn checked_ceil_div(&self, other: &Self) -> Option<Self>;

    /// Computes `self * numerator / denominator` rounding down. Returns `None`
    /// if the intermediate product overflows or the denominator is zero.
    fn checked_mul_div_down(&self, numerator: &Self, denominator: &Self) -> Option<Self>;

    /// Computes `self * numerator / denominator` rounding up. Returns `None`
    /// if the intermediate product overflows or the denominator is zero.
    fn checked_mul_div_up(&self, numerator: &Self, denominator: &Self) -> Option<Self>;
}

impl U256Ext for U256 {
    fn checked_ceil_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        // Avoids the `self + other - 1` overflow for values close to `MAX`.
        let quotient = self.checked_div(*other)?;
        if (self % other).is_zero() {
            Some(quotient)
        } else {
            quotient.checked_add(U256::from(1))
        }
    }

    fn checked_mul_div_down(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        self.checked_mul(*numerator)?.checked_div(*denominator)
    }

    fn checked_mul_div_up(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        self.checked_mul(*numerator)?.checked_ceil_div(denominator)
    }
}
