//! Increase variant
//!
//! An existing position is looked up by id, its pool is found by token pair
//! and fee rate, and the solver runs over the stored range.

use crate::rebalance::oracle::{PoolSnapshot, QuoteOracle};
use crate::rebalance::solver::{solve, BalancePair, RebalanceDecision, TickRange};
use anchor_lang::prelude::*;

/// Range and pool identity stored with a position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub fee_rate: u32,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
}

/// Read-only lookup of existing positions
pub trait PositionRegistry {
    /// Fails with `PositionNotFound` for an unknown id
    fn resolve_position(&self, position_id: &Pubkey) -> Result<ResolvedPosition>;
}

/// Read-only lookup of pools by token pair and fee rate
pub trait PoolDirectory {
    /// Fails with `PoolNotFound` when no such pool exists
    fn pool(&self, token_a: &Pubkey, token_b: &Pubkey, fee_rate: u32) -> Result<PoolSnapshot>;
}

/// Solver decision plus what the caller needs to execute it
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncreaseDecision {
    pub decision: RebalanceDecision,
    pub fee_rate: u32,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Increase variant: rebalance toward an existing position's range
///
/// `oracle` must quote the pool the position lives in.
pub fn solve_increase<R, D, Q>(
    registry: &R,
    pools: &D,
    oracle: &Q,
    position_id: &Pubkey,
    balance_a: u64,
    balance_b: u64,
    precision_budget: u8,
) -> Result<IncreaseDecision>
where
    R: PositionRegistry + ?Sized,
    D: PoolDirectory + ?Sized,
    Q: QuoteOracle + ?Sized,
{
    let position = registry.resolve_position(position_id)?;
    let range = TickRange::new(position.tick_lower, position.tick_upper)?;
    let pool = pools.pool(&position.token_a, &position.token_b, position.fee_rate)?;

    let decision = solve(
        oracle,
        &pool,
        &range,
        BalancePair::new(balance_a, balance_b),
        precision_budget,
    )?;

    Ok(IncreaseDecision {
        decision,
        fee_rate: position.fee_rate,
        token_a: position.token_a,
        token_b: position.token_b,
        tick_lower: position.tick_lower,
        tick_upper: position.tick_upper,
    })
}
