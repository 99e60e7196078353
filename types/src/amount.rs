//! Token amounts and the 18-decimal fixed-point convention.
//!
//! Balances are raw integer units (u128). Gauge scales are fixed-point numbers
//! where [`FIXED_POINT_ONE`] represents 1.0. Intermediate products are taken in
//! 256 bits so that `balance * scale` never overflows before the division.

use primitive_types::U256;

/// Raw token units.
pub type Amount = u128;

/// 1.0 in 18-decimal fixed point.
pub const FIXED_POINT_ONE: Amount = 1_000_000_000_000_000_000;

/// Multiply an amount by a fixed-point factor, truncating toward zero.
///
/// Returns `None` only when the final quotient does not fit in 128 bits.
pub fn checked_mul_fixed(amount: Amount, factor: Amount) -> Option<Amount> {
    let product = U256::from(amount) * U256::from(factor) / U256::from(FIXED_POINT_ONE);
    narrow(product)
}

/// Narrow a 256-bit value back to an [`Amount`].
pub fn narrow(value: U256) -> Option<Amount> {
    if value > U256::from(u128::MAX) {
        None
    } else {
        Some(value.low_u128())
    }
}
