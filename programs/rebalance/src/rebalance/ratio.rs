//! Liquidity Ratio Model
//!
//! The mix of token A and token B a position needs so that a mint over
//! [tick_lower, tick_upper] at the current price leaves nothing behind.
//!
//! Per unit of liquidity a position holds
//!   amount_a = (sqrt_upper - sqrt_price) / (sqrt_price * sqrt_upper)
//!   amount_b = sqrt_price - sqrt_lower
//! Both are multiplied by sqrt_price before being stored, which keeps the
//! ratio exact enough to tell adjacent ticks apart while every cross product
//! with a u64 balance fits in 256 bits.

use std::cmp::Ordering;

use crate::math::full_math::{mul_div, U256};
use crate::math::tick_math::get_sqrt_price_at_tick;
use anchor_lang::prelude::*;

/// Proportion of token A to token B a zero-dust mint requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityRatio {
    /// Price at or below the range: the position is entirely token A
    AllA,
    /// Price at or above the range: the position is entirely token B
    AllB,
    /// Price inside the range: both weights are strictly positive
    Mixed {
        /// (sqrt_upper - sqrt_price) / sqrt_upper, Q0.128
        weight_a: u128,
        /// sqrt_price * (sqrt_price - sqrt_lower), Q128.128
        weight_b: U256,
    },
}

impl LiquidityRatio {
    /// Compare a balance pair against the ratio
    ///
    /// `Greater` means token A is overweight, `Less` means token B is
    /// overweight, `Equal` means the pair mints with no leftover.
    pub fn compare_balances(&self, amount_a: u64, amount_b: u64) -> Ordering {
        match self {
            LiquidityRatio::AllA => {
                if amount_b == 0 {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            }
            LiquidityRatio::AllB => {
                if amount_a == 0 {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            LiquidityRatio::Mixed { weight_a, weight_b } => {
                // amount_a / amount_b vs weight_a / weight_b
                let lhs = U256::from(amount_a) * *weight_b;
                let rhs = U256::from(amount_b) * U256::from(*weight_a);
                lhs.cmp(&rhs)
            }
        }
    }

    /// Token A units required per unit of token B
    pub fn a_per_b(&self) -> f64 {
        match self {
            LiquidityRatio::AllA => f64::INFINITY,
            LiquidityRatio::AllB => 0.0,
            LiquidityRatio::Mixed { weight_a, weight_b } => {
                *weight_a as f64 / u256_to_f64(*weight_b)
            }
        }
    }
}

/// Required ratio at `current_tick` for a position over [tick_lower, tick_upper]
pub fn required_ratio(current_tick: i32, tick_lower: i32, tick_upper: i32) -> Result<LiquidityRatio> {
    if current_tick <= tick_lower {
        return Ok(LiquidityRatio::AllA);
    }
    if current_tick >= tick_upper {
        return Ok(LiquidityRatio::AllB);
    }
    required_ratio_at_sqrt_price(
        get_sqrt_price_at_tick(current_tick)?,
        get_sqrt_price_at_tick(tick_lower)?,
        get_sqrt_price_at_tick(tick_upper)?,
    )
}

/// Required ratio at an arbitrary sqrt price, e.g. the price a simulated swap lands on
pub fn required_ratio_at_sqrt_price(
    sqrt_price_x64: u128,
    sqrt_price_lower_x64: u128,
    sqrt_price_upper_x64: u128,
) -> Result<LiquidityRatio> {
    if sqrt_price_x64 <= sqrt_price_lower_x64 {
        return Ok(LiquidityRatio::AllA);
    }
    if sqrt_price_x64 >= sqrt_price_upper_x64 {
        return Ok(LiquidityRatio::AllB);
    }

    // (sqrt_upper - sqrt_price) * 2^128 / sqrt_upper < 2^128
    let weight_a = mul_div(
        sqrt_price_upper_x64 - sqrt_price_x64,
        u128::MAX,
        sqrt_price_upper_x64,
    )?
    .max(1);
    let weight_b =
        U256::from(sqrt_price_x64) * U256::from(sqrt_price_x64 - sqrt_price_lower_x64);

    Ok(LiquidityRatio::Mixed { weight_a, weight_b })
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18446744073709551616.0 + *limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_below_range_is_all_a() {
        assert_eq!(required_ratio(-6000, -6000, 6900).unwrap(), LiquidityRatio::AllA);
        assert_eq!(required_ratio(-7000, -6000, 6900).unwrap(), LiquidityRatio::AllA);
    }

    #[test]
    fn test_above_range_is_all_b() {
        assert_eq!(required_ratio(6900, -6000, 6900).unwrap(), LiquidityRatio::AllB);
        assert_eq!(required_ratio(10_000, -6000, 6900).unwrap(), LiquidityRatio::AllB);
    }

    #[test]
    fn test_symmetric_range_at_unit_price_is_balanced() {
        // price 1, range [-6000, 6000]: both sides need 1 - 1.0001^-3000 per unit of liquidity
        let ratio = required_ratio(0, -6000, 6000).unwrap();
        assert!((ratio.a_per_b() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_in_range_matches_closed_form() {
        let ratio = required_ratio(0, -6000, 6900).unwrap();
        let expected = (1.0 - 1.0001f64.powf(-3450.0)) / (1.0 - 1.0001f64.powf(-3000.0));
        assert!((ratio.a_per_b() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_adjacent_ticks_are_distinguishable() {
        let here = required_ratio(100, -6000, 6900).unwrap();
        let next = required_ratio(101, -6000, 6900).unwrap();
        assert_ne!(here, next);
        assert!(next.a_per_b() < here.a_per_b());
    }

    #[test]
    fn test_compare_balances_one_sided() {
        assert_eq!(LiquidityRatio::AllA.compare_balances(10, 0), Ordering::Equal);
        assert_eq!(LiquidityRatio::AllA.compare_balances(0, 0), Ordering::Equal);
        assert_eq!(LiquidityRatio::AllA.compare_balances(10, 1), Ordering::Less);
        assert_eq!(LiquidityRatio::AllB.compare_balances(0, 10), Ordering::Equal);
        assert_eq!(LiquidityRatio::AllB.compare_balances(1, 10), Ordering::Greater);
    }

    #[test]
    fn test_compare_balances_in_range() {
        let ratio = required_ratio(0, -6000, 6000).unwrap();
        assert_eq!(ratio.compare_balances(0, 100), Ordering::Less);
        assert_eq!(ratio.compare_balances(100, 0), Ordering::Greater);
        assert_eq!(ratio.compare_balances(0, 0), Ordering::Equal);
        assert_eq!(ratio.compare_balances(1_000_000, 500_000), Ordering::Greater);
    }

    #[test]
    fn test_extreme_ticks_stay_positive() {
        let ratio = required_ratio(443_000, 442_000, 443_600).unwrap();
        match ratio {
            LiquidityRatio::Mixed { weight_a, weight_b } => {
                assert!(weight_a > 0);
                assert!(!weight_b.is_zero());
            }
            other => panic!("expected mixed ratio, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_ratio_decreases_as_price_rises(
            lower in -200_000i32..200_000,
            width in 2i32..50_000,
            offset in 0i32..50_000,
        ) {
            let upper = lower + width;
            let tick = lower + offset % (width - 1);
            let here = required_ratio(tick, lower, upper).unwrap();
            let next = required_ratio(tick + 1, lower, upper).unwrap();
            prop_assert!(next.a_per_b() < here.a_per_b());
        }

        #[test]
        fn prop_boundaries_are_one_sided(
            lower in -200_000i32..200_000,
            width in 1i32..50_000,
            outside in 0i32..10_000,
        ) {
            let upper = lower + width;
            prop_assert_eq!(required_ratio(lower - outside, lower, upper).unwrap(), LiquidityRatio::AllA);
            prop_assert_eq!(required_ratio(upper + outside, lower, upper).unwrap(), LiquidityRatio::AllB);
        }
    }
}
