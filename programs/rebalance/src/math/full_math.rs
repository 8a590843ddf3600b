//! Full precision math operations
//!
//! 256-bit intermediates for Q64.64 products and quotients.

use crate::errors::RebalanceError;
use anchor_lang::prelude::*;

// construct_uint! expands against core's two-parameter `Result`, not the
// anchor prelude alias
mod u256 {
    uint::construct_uint! {
        /// 256-bit unsigned integer used for intermediate products
        pub struct U256(4);
    }
}

pub use u256::U256;

pub use crate::constants::Q64;

/// Multiply two u128 numbers and divide by a third, rounding down
///
/// # Formula
/// result = floor(a * b / denominator)
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    let (quotient, _) = mul_div_rem(a, b, denominator)?;
    to_u128(quotient)
}

/// Multiply two u128 numbers and divide by a third, rounding up
pub fn mul_div_round_up(a: u128, b: u128, denominator: u128) -> Result<u128> {
    let (quotient, remainder) = mul_div_rem(a, b, denominator)?;
    let rounded = if remainder.is_zero() {
        quotient
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(RebalanceError::MathOverflow)?
    };
    to_u128(rounded)
}

/// Narrow a U256 to u128, failing if the high half is set
pub fn to_u128(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(RebalanceError::MulDivOverflow.into());
    }
    Ok(value.low_u128())
}

fn mul_div_rem(a: u128, b: u128, denominator: u128) -> Result<(U256, U256)> {
    if denominator == 0 {
        return Err(RebalanceError::DivisionByZero.into());
    }
    // a, b < 2^128 so the product always fits in 256 bits
    let product = U256::from(a) * U256::from(b);
    Ok(product.div_mod(U256::from(denominator)))
}
