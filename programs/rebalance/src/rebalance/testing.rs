//! Pools, positions and oracles shared by the solver tests

use std::cell::Cell;

use crate::errors::RebalanceError;
use crate::math::full_math::{mul_div, Q64};
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::rebalance::oracle::{InitializedTick, PoolSnapshot, Quote, QuoteOracle, TickSet};
use anchor_lang::prelude::*;

pub fn mint(byte: u8) -> Pubkey {
    Pubkey::new_from_array([byte; 32])
}

/// Pool of mint(1)/mint(2) at 0.3% priced exactly at `tick`
pub fn pool_at(tick: i32, liquidity: u128) -> PoolSnapshot {
    PoolSnapshot {
        token_mint_a: mint(1),
        token_mint_b: mint(2),
        fee_rate: 3000,
        tick_spacing: 60,
        sqrt_price_x64: get_sqrt_price_at_tick(tick).unwrap(),
        tick_current: tick,
        liquidity,
    }
}

/// Single position over [lower, upper] holding `liquidity`
pub fn position_ticks(lower: i32, upper: i32, liquidity: u128) -> TickSet {
    TickSet::unbounded(vec![
        InitializedTick { index: lower, liquidity_net: liquidity as i128 },
        InitializedTick { index: upper, liquidity_net: -(liquidity as i128) },
    ])
}

/// Quotes every amount at a fixed price with no fee and no price impact
pub struct FixedPriceOracle {
    pub sqrt_price_x64: u128,
    pub calls: Cell<u32>,
    /// Amounts above this are unavailable
    pub max_amount: u64,
}

impl FixedPriceOracle {
    pub fn at(sqrt_price_x64: u128) -> Self {
        Self {
            sqrt_price_x64,
            calls: Cell::new(0),
            max_amount: u64::MAX,
        }
    }
}

impl QuoteOracle for FixedPriceOracle {
    fn quote(&self, token_in: &Pubkey, _token_out: &Pubkey, _fee_rate: u32, amount_in: u64) -> Result<Quote> {
        self.calls.set(self.calls.get() + 1);
        require!(amount_in <= self.max_amount, RebalanceError::QuoteUnavailable);

        // price = (sqrt_price / Q64)^2, floored once per factor
        let sqrt_price = self.sqrt_price_x64;
        let amount_out = if *token_in == mint(1) {
            mul_div(mul_div(amount_in as u128, sqrt_price, Q64)?, sqrt_price, Q64)?
        } else {
            mul_div(mul_div(amount_in as u128, Q64, sqrt_price)?, Q64, sqrt_price)?
        };
        Ok(Quote {
            amount_out: u64::try_from(amount_out).map_err(|_| RebalanceError::CastOverflow)?,
            sqrt_price_after_x64: sqrt_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_price_oracle_is_exact_beyond_f64_precision() {
        // 2^53 + 1 is not representable as f64
        let amount = (1u64 << 53) + 1;
        let oracle = FixedPriceOracle::at(Q64);
        let quote = oracle.quote(&mint(1), &mint(2), 3000, amount).unwrap();
        assert_eq!(quote.amount_out, amount);
        let quote = oracle.quote(&mint(2), &mint(1), 3000, u64::MAX).unwrap();
        assert_eq!(quote.amount_out, u64::MAX);
    }

    #[test]
    fn test_fixed_price_oracle_at_price_four() {
        let oracle = FixedPriceOracle::at(2 * Q64);
        let a_to_b = oracle.quote(&mint(1), &mint(2), 3000, 1_000_000_000_000_000).unwrap();
        assert_eq!(a_to_b.amount_out, 4_000_000_000_000_000);
        let b_to_a = oracle.quote(&mint(2), &mint(1), 3000, 1_000_000_000_000_001).unwrap();
        assert_eq!(b_to_a.amount_out, 250_000_000_000_000);
        assert!(oracle.quote(&mint(1), &mint(2), 3000, u64::MAX).is_err());
    }
}
