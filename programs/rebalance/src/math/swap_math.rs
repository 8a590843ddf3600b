//! Swap Math
//!
//! Exact-input swap step used to simulate quotes.

use crate::constants::FEE_RATE_DENOMINATOR;
use crate::errors::RebalanceError;
use crate::math::full_math::{mul_div, mul_div_round_up};
use crate::math::liquidity_math::{get_amount_a_delta, get_amount_b_delta};
use crate::math::sqrt_price_math::get_next_sqrt_price_from_input;
use anchor_lang::prelude::*;

/// Result of a single swap step computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStepResult {
    /// The new sqrt price after the swap step
    pub sqrt_price_next_x64: u128,
    /// Amount of input token consumed, excluding fee
    pub amount_in: u64,
    /// Amount of output token produced
    pub amount_out: u64,
    /// Fee amount charged on the input
    pub fee_amount: u64,
}

/// Compute the result of a single exact-input swap step
///
/// # Arguments
/// * `sqrt_price_current_x64` - Current sqrt price (Q64.64)
/// * `sqrt_price_target_x64` - Target sqrt price (next tick or price limit)
/// * `liquidity` - Active liquidity
/// * `amount_remaining` - Input still to be swapped, fee included
/// * `fee_rate` - Fee rate in hundredths of a bip (3000 = 0.3%)
///
/// Direction follows the target: a lower target swaps token A for token B.
pub fn compute_swap_step(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    amount_remaining: u64,
    fee_rate: u32,
) -> Result<SwapStepResult> {
    if fee_rate >= FEE_RATE_DENOMINATOR {
        return Err(RebalanceError::InvalidFeeTier.into());
    }
    let a_to_b = sqrt_price_current_x64 >= sqrt_price_target_x64;

    let amount_remaining_less_fee = mul_div(
        amount_remaining as u128,
        (FEE_RATE_DENOMINATOR - fee_rate) as u128,
        FEE_RATE_DENOMINATOR as u128,
    )?;

    // Input needed to reach the target price
    let amount_in_max = if a_to_b {
        get_amount_a_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, true)?
    } else {
        get_amount_b_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, true)?
    };

    let (sqrt_price_next_x64, amount_in) = if amount_remaining_less_fee >= amount_in_max {
        (sqrt_price_target_x64, amount_in_max)
    } else {
        // amount_remaining_less_fee < amount_in_max here, and it never exceeds a u64
        let amount_in = amount_remaining_less_fee as u64;
        let next = get_next_sqrt_price_from_input(
            sqrt_price_current_x64,
            liquidity,
            amount_in,
            a_to_b,
        )?;
        (next, amount_in as u128)
    };

    let amount_out = if a_to_b {
        get_amount_b_delta(sqrt_price_next_x64, sqrt_price_current_x64, liquidity, false)?
    } else {
        get_amount_a_delta(sqrt_price_current_x64, sqrt_price_next_x64, liquidity, false)?
    };

    let amount_in = u64::try_from(amount_in).map_err(|_| RebalanceError::CastOverflow)?;
    let amount_out = u64::try_from(amount_out).map_err(|_| RebalanceError::CastOverflow)?;

    // Target not reached: the whole remainder is consumed, fee is what's left over
    let fee_amount = if sqrt_price_next_x64 != sqrt_price_target_x64 {
        amount_remaining.saturating_sub(amount_in)
    } else {
        let fee = mul_div_round_up(
            amount_in as u128,
            fee_rate as u128,
            (FEE_RATE_DENOMINATOR - fee_rate) as u128,
        )?;
        u64::try_from(fee).map_err(|_| RebalanceError::CastOverflow)?
    };

    Ok(SwapStepResult {
        sqrt_price_next_x64,
        amount_in,
        amount_out,
        fee_amount,
    })
}
