//! Liquidity Math
//!
//! Token amounts for a liquidity amount over a sqrt-price interval and the
//! inverse. Deltas are returned as u128 so that a swap step spanning a wide
//! price interval can be compared against a u64 input without overflowing.

use crate::errors::RebalanceError;
use crate::math::full_math::{mul_div, mul_div_round_up, to_u128, U256, Q64};
use anchor_lang::prelude::*;

/// Add a signed liquidity delta to existing liquidity
pub fn add_liquidity_delta(x: u128, y: i128) -> Result<u128> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(RebalanceError::LiquidityNetOverflow.into())
    } else {
        x.checked_add(y as u128)
            .ok_or(RebalanceError::LiquidityNetOverflow.into())
    }
}

fn ordered(sqrt_price_a_x64: u128, sqrt_price_b_x64: u128) -> (u128, u128) {
    if sqrt_price_a_x64 < sqrt_price_b_x64 {
        (sqrt_price_a_x64, sqrt_price_b_x64)
    } else {
        (sqrt_price_b_x64, sqrt_price_a_x64)
    }
}

/// Amount of token A spanned by `liquidity` between two sqrt prices
///
/// amount_a = liquidity * (sqrt_price_b - sqrt_price_a) / (sqrt_price_a * sqrt_price_b)
pub fn get_amount_a_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    if sqrt_price_lower == 0 {
        return Err(RebalanceError::DivisionByZero.into());
    }

    let diff = sqrt_price_upper - sqrt_price_lower;

    // L * diff * Q64 / (sp_upper * sp_lower) in a single 256-bit division
    let numerator = (U256::from(liquidity) * U256::from(diff)).checked_mul(U256::from(Q64));
    if let Some(numerator) = numerator {
        let denominator = U256::from(sqrt_price_upper) * U256::from(sqrt_price_lower);
        let (quotient, remainder) = numerator.div_mod(denominator);
        return if round_up && !remainder.is_zero() {
            to_u128(quotient + U256::one())
        } else {
            to_u128(quotient)
        };
    }

    // L * diff * Q64 overflows 256 bits: divide in two steps
    if round_up {
        let intermediate = mul_div_round_up(liquidity, diff, sqrt_price_upper)?;
        mul_div_round_up(intermediate, Q64, sqrt_price_lower)
    } else {
        let intermediate = mul_div(liquidity, diff, sqrt_price_upper)?;
        mul_div(intermediate, Q64, sqrt_price_lower)
    }
}

/// Amount of token B spanned by `liquidity` between two sqrt prices
///
/// amount_b = liquidity * (sqrt_price_b - sqrt_price_a)
pub fn get_amount_b_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    let diff = sqrt_price_upper - sqrt_price_lower;

    if round_up {
        mul_div_round_up(liquidity, diff, Q64)
    } else {
        mul_div(liquidity, diff, Q64)
    }
}

/// Liquidity provided by `amount_a` of token A between two sqrt prices
pub fn get_liquidity_for_amount_a(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_a: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);

    // L = amount_a * sp_upper * sp_lower / (Q64 * (sp_upper - sp_lower))
    let diff = sqrt_price_upper - sqrt_price_lower;
    let intermediate = mul_div(amount_a as u128, sqrt_price_upper, diff)?;
    mul_div(intermediate, sqrt_price_lower, Q64)
}

/// Liquidity provided by `amount_b` of token B between two sqrt prices
pub fn get_liquidity_for_amount_b(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_b: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    mul_div(amount_b as u128, Q64, sqrt_price_upper - sqrt_price_lower)
}

/// Maximum liquidity mintable from the given amounts for the range
/// [sqrt_price_lower, sqrt_price_upper] at the current sqrt price
pub fn get_liquidity_for_amounts(
    sqrt_price_current_x64: u128,
    sqrt_price_lower_x64: u128,
    sqrt_price_upper_x64: u128,
    amount_a: u64,
    amount_b: u64,
) -> Result<u128> {
    if sqrt_price_current_x64 <= sqrt_price_lower_x64 {
        get_liquidity_for_amount_a(sqrt_price_lower_x64, sqrt_price_upper_x64, amount_a)
    } else if sqrt_price_current_x64 < sqrt_price_upper_x64 {
        let liquidity_a =
            get_liquidity_for_amount_a(sqrt_price_current_x64, sqrt_price_upper_x64, amount_a)?;
        let liquidity_b =
            get_liquidity_for_amount_b(sqrt_price_lower_x64, sqrt_price_current_x64, amount_b)?;
        Ok(liquidity_a.min(liquidity_b))
    } else {
        get_liquidity_for_amount_b(sqrt_price_lower_x64, sqrt_price_upper_x64, amount_b)
    }
}

/// Token amounts a mint of `liquidity` consumes at the current sqrt price
pub fn get_amounts_for_liquidity(
    sqrt_price_current_x64: u128,
    sqrt_price_lower_x64: u128,
    sqrt_price_upper_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    let (amount_a, amount_b) = if sqrt_price_current_x64 <= sqrt_price_lower_x64 {
        (
            get_amount_a_delta(sqrt_price_lower_x64, sqrt_price_upper_x64, liquidity, round_up)?,
            0,
        )
    } else if sqrt_price_current_x64 < sqrt_price_upper_x64 {
        (
            get_amount_a_delta(sqrt_price_current_x64, sqrt_price_upper_x64, liquidity, round_up)?,
            get_amount_b_delta(sqrt_price_lower_x64, sqrt_price_current_x64, liquidity, round_up)?,
        )
    } else {
        (
            0,
            get_amount_b_delta(sqrt_price_lower_x64, sqrt_price_upper_x64, liquidity, round_up)?,
        )
    };

    Ok((
        u64::try_from(amount_a).map_err(|_| RebalanceError::CastOverflow)?,
        u64::try_from(amount_b).map_err(|_| RebalanceError::CastOverflow)?,
    ))
}
