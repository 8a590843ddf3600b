//! Quote Oracle Adapter
//!
//! Side-effect-free swap simulation. The solver only sees the `QuoteOracle`
//! trait; `PoolQuoter` is the implementation that walks a pool snapshot and
//! its initialized ticks the same way the AMM's swap loop does, without
//! writing anything back.

use crate::constants::{MAX_QUOTE_STEPS, MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK, TICK_ARRAY_SIZE};
use crate::errors::RebalanceError;
use crate::math::liquidity_math::add_liquidity_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::TickArrayView;
use anchor_lang::prelude::*;

/// Result of a simulated exact-input swap
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quote {
    /// Output token received
    pub amount_out: u64,
    /// Pool sqrt price once the swap has been applied
    pub sqrt_price_after_x64: u128,
}

/// Read-only price quoting capability
pub trait QuoteOracle {
    /// Simulate swapping exactly `amount_in` of `token_in` for `token_out`
    ///
    /// Fails with `QuoteUnavailable` when the input cannot be filled.
    fn quote(
        &self,
        token_in: &Pubkey,
        token_out: &Pubkey,
        fee_rate: u32,
        amount_in: u64,
    ) -> Result<Quote>;
}

/// Price state of a pool at one instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    /// Fee rate in hundredths of a bip
    pub fee_rate: u32,
    pub tick_spacing: u16,
    pub sqrt_price_x64: u128,
    pub tick_current: i32,
    /// Liquidity active at the current price
    pub liquidity: u128,
}

impl PoolSnapshot {
    /// Whether swapping `token_in` for `token_out` moves the price down
    pub fn is_a_to_b(&self, token_in: &Pubkey, token_out: &Pubkey) -> Result<bool> {
        if *token_in == self.token_mint_a && *token_out == self.token_mint_b {
            Ok(true)
        } else if *token_in == self.token_mint_b && *token_out == self.token_mint_a {
            Ok(false)
        } else {
            Err(RebalanceError::InvalidTokenMint.into())
        }
    }
}

/// An initialized tick and the liquidity change when crossing it upwards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializedTick {
    pub index: i32,
    pub liquidity_net: i128,
}

/// Initialized ticks known to the quoter and the tick span they cover
///
/// Outside `[lower_bound, upper_bound]` nothing is known about the pool's
/// liquidity, so a simulation stops there.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSet {
    ticks: Vec<InitializedTick>,
    lower_bound: i32,
    upper_bound: i32,
}

impl TickSet {
    pub fn new(mut ticks: Vec<InitializedTick>, lower_bound: i32, upper_bound: i32) -> Self {
        ticks.sort_by_key(|tick| tick.index);
        Self {
            ticks,
            lower_bound: lower_bound.max(MIN_TICK),
            upper_bound: upper_bound.min(MAX_TICK),
        }
    }

    /// Tick set spanning the whole price curve
    pub fn unbounded(ticks: Vec<InitializedTick>) -> Self {
        Self::new(ticks, MIN_TICK, MAX_TICK)
    }

    /// Build a tick set from the AMM's tick arrays
    ///
    /// The arrays must be contiguous and include the array holding
    /// `tick_current`; their order in the slice does not matter.
    pub fn from_tick_arrays(
        arrays: &[TickArrayView],
        tick_spacing: u16,
        tick_current: i32,
    ) -> Result<Self> {
        require!(!arrays.is_empty(), RebalanceError::InvalidTickArray);
        require!(tick_spacing > 0, RebalanceError::InvalidFeeTier);
        let ticks_per_array = TICK_ARRAY_SIZE as i32 * tick_spacing as i32;

        let mut starts: Vec<i32> = arrays.iter().map(|array| array.start_tick_index).collect();
        starts.sort_unstable();
        for pair in starts.windows(2) {
            require!(
                pair[1] - pair[0] == ticks_per_array,
                RebalanceError::InvalidTickArray
            );
        }

        let lower_bound = starts[0];
        let upper_bound = starts[starts.len() - 1]
            .checked_add(ticks_per_array)
            .ok_or(RebalanceError::MathOverflow)?;
        require!(
            tick_current >= lower_bound && tick_current < upper_bound,
            RebalanceError::InvalidTickArray
        );

        let ticks = arrays
            .iter()
            .flat_map(|array| array.initialized_ticks(tick_spacing))
            .collect();
        Ok(Self::new(ticks, lower_bound, upper_bound))
    }

    /// Next initialized tick in the swap direction
    ///
    /// Moving down the search is inclusive of `tick`, moving up it is not.
    pub fn next_initialized(&self, tick: i32, a_to_b: bool) -> Option<&InitializedTick> {
        let position = self.ticks.partition_point(|t| t.index <= tick);
        let next = if a_to_b {
            position.checked_sub(1).and_then(|i| self.ticks.get(i))
        } else {
            self.ticks.get(position)
        };
        next.filter(|t| t.index >= self.lower_bound && t.index <= self.upper_bound)
    }

    /// Last tick the simulation may reach in the swap direction
    pub fn boundary(&self, a_to_b: bool) -> i32 {
        if a_to_b {
            self.lower_bound
        } else {
            self.upper_bound
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// Quote oracle simulating swaps against a pool snapshot
#[derive(Clone, Copy, Debug)]
pub struct PoolQuoter<'a> {
    pool: &'a PoolSnapshot,
    ticks: &'a TickSet,
}

/// Simulation progress through the tick set
struct QuoteState {
    amount_remaining: u64,
    amount_calculated: u64,
    sqrt_price_x64: u128,
    tick: i32,
    liquidity: u128,
}

impl<'a> PoolQuoter<'a> {
    pub fn new(pool: &'a PoolSnapshot, ticks: &'a TickSet) -> Self {
        Self { pool, ticks }
    }

    pub fn pool(&self) -> &PoolSnapshot {
        self.pool
    }
}

impl QuoteOracle for PoolQuoter<'_> {
    fn quote(
        &self,
        token_in: &Pubkey,
        token_out: &Pubkey,
        fee_rate: u32,
        amount_in: u64,
    ) -> Result<Quote> {
        let a_to_b = self.pool.is_a_to_b(token_in, token_out)?;
        require!(fee_rate == self.pool.fee_rate, RebalanceError::InvalidFeeTier);

        if amount_in == 0 {
            return Ok(Quote {
                amount_out: 0,
                sqrt_price_after_x64: self.pool.sqrt_price_x64,
            });
        }

        let sqrt_price_limit_x64 = if a_to_b {
            MIN_SQRT_PRICE_X64 + 1
        } else {
            MAX_SQRT_PRICE_X64 - 1
        };

        let mut state = QuoteState {
            amount_remaining: amount_in,
            amount_calculated: 0,
            sqrt_price_x64: self.pool.sqrt_price_x64,
            tick: self.pool.tick_current,
            liquidity: self.pool.liquidity,
        };

        for _ in 0..MAX_QUOTE_STEPS {
            if state.amount_remaining == 0 || state.sqrt_price_x64 == sqrt_price_limit_x64 {
                break;
            }

            let next = self.ticks.next_initialized(state.tick, a_to_b).copied();
            let tick_next = next
                .map(|t| t.index)
                .unwrap_or_else(|| self.ticks.boundary(a_to_b))
                .clamp(MIN_TICK, MAX_TICK);

            let sqrt_price_next_tick = get_sqrt_price_at_tick(tick_next)?;
            let sqrt_price_target = if a_to_b {
                sqrt_price_next_tick.max(sqrt_price_limit_x64)
            } else {
                sqrt_price_next_tick.min(sqrt_price_limit_x64)
            };

            // Known span exhausted behind the current price
            if (a_to_b && sqrt_price_target > state.sqrt_price_x64)
                || (!a_to_b && sqrt_price_target < state.sqrt_price_x64)
            {
                break;
            }

            let step = compute_swap_step(
                state.sqrt_price_x64,
                sqrt_price_target,
                state.liquidity,
                state.amount_remaining,
                fee_rate,
            )?;

            let sqrt_price_before = state.sqrt_price_x64;
            state.sqrt_price_x64 = step.sqrt_price_next_x64;
            state.amount_remaining = state
                .amount_remaining
                .checked_sub(step.amount_in)
                .and_then(|remaining| remaining.checked_sub(step.fee_amount))
                .ok_or(RebalanceError::MathOverflow)?;
            state.amount_calculated = state
                .amount_calculated
                .checked_add(step.amount_out)
                .ok_or(RebalanceError::MathOverflow)?;

            if state.sqrt_price_x64 == sqrt_price_next_tick {
                match next {
                    Some(crossed) => {
                        // Moving left exits positions, moving right enters them
                        let liquidity_net = if a_to_b {
                            crossed
                                .liquidity_net
                                .checked_neg()
                                .ok_or(RebalanceError::LiquidityNetOverflow)?
                        } else {
                            crossed.liquidity_net
                        };
                        state.liquidity = add_liquidity_delta(state.liquidity, liquidity_net)?;
                        state.tick = if a_to_b { tick_next - 1 } else { tick_next };
                    }
                    None => break,
                }
            } else if state.sqrt_price_x64 != sqrt_price_before {
                state.tick = get_tick_at_sqrt_price(state.sqrt_price_x64)?;
            }
        }

        require!(state.amount_remaining == 0, RebalanceError::QuoteUnavailable);

        Ok(Quote {
            amount_out: state.amount_calculated,
            sqrt_price_after_x64: state.sqrt_price_x64,
        })
    }
}
