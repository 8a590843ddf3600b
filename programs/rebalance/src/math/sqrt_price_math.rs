//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given an exact input amount.

use crate::constants::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use crate::errors::RebalanceError;
use crate::math::full_math::{mul_div, to_u128, U256, Q64};
use anchor_lang::prelude::*;

/// Get the next sqrt price after adding `amount` of token A to the pool
///   new_sqrt_price = L * sqrt_price / (L + amount * sqrt_price)
///
/// Rounds up so the price never moves further than the input pays for.
pub fn get_next_sqrt_price_from_amount_a_rounding_up(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }
    if liquidity == 0 {
        return Err(RebalanceError::DivisionByZero.into());
    }

    // L is a plain integer, sqrt_price is Q64.64, so L << 64 puts both terms in Q64.64
    let numerator = U256::from(liquidity) << 64;
    let product = U256::from(amount) * U256::from(sqrt_price_x64);
    let denominator = numerator + product;

    // Very deep pools overflow L * sqrt_price; fall back to L / (L / sqrt_price + amount)
    let (quotient, remainder) = match numerator.checked_mul(U256::from(sqrt_price_x64)) {
        Some(full) => full.div_mod(denominator),
        None => numerator.div_mod(numerator / U256::from(sqrt_price_x64) + U256::from(amount)),
    };
    let next = if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    let next = to_u128(next)?;

    if next < MIN_SQRT_PRICE_X64 {
        return Err(RebalanceError::SqrtPriceBelowMinimum.into());
    }
    Ok(next)
}

/// Get the next sqrt price after adding `amount` of token B to the pool
///   new_sqrt_price = sqrt_price + amount / L
pub fn get_next_sqrt_price_from_amount_b_rounding_down(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }

    let quotient = mul_div(amount as u128, Q64, liquidity)?;
    let next = sqrt_price_x64
        .checked_add(quotient)
        .ok_or(RebalanceError::SqrtPriceAboveMaximum)?;

    if next > MAX_SQRT_PRICE_X64 {
        return Err(RebalanceError::SqrtPriceAboveMaximum.into());
    }
    Ok(next)
}

/// Get the next sqrt price from an exact input amount
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_in: u64,
    a_to_b: bool,
) -> Result<u128> {
    if a_to_b {
        // Adding token A, sqrt price decreases
        get_next_sqrt_price_from_amount_a_rounding_up(sqrt_price_x64, liquidity, amount_in)
    } else {
        // Adding token B, sqrt price increases
        get_next_sqrt_price_from_amount_b_rounding_down(sqrt_price_x64, liquidity, amount_in)
    }
}
