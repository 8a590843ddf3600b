use anchor_lang::prelude::*;
use crate::constants::seeds;
use crate::errors::RebalanceError;
use crate::math::tick_math::is_valid_tick;
use crate::rebalance::{
    project_deposit, solve_deposit, BalancePair, DepositProjection, PoolQuoter, RebalanceDecision,
    TickRange,
};
use crate::state::{PoolAccounts, RebalanceConfig};

/// Plan the swap that precedes opening a position
///
/// Remaining accounts: the pool's tick arrays around the current price,
/// contiguous, any order.
#[derive(Accounts)]
pub struct RebalanceDeposit<'info> {
    #[account(seeds = [seeds::CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, RebalanceConfig>,

    /// The AMM pool to deposit into
    /// CHECK: owner and discriminator are checked against config.amm_program
    pub pool: UncheckedAccount<'info>,

    /// The pool's fee tier
    /// CHECK: owner and discriminator are checked against config.amm_program
    pub fee_tier: UncheckedAccount<'info>,
}

/// Swap decision and the deposit it leads to
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositPlan {
    pub decision: RebalanceDecision,
    pub projection: DepositProjection,
}

/// Rebalance deposit handler
pub fn handler(
    ctx: Context<RebalanceDeposit>,
    tick_lower: i32,
    tick_upper: i32,
    balance_a: u64,
    balance_b: u64,
    precision_budget: Option<u8>,
) -> Result<DepositPlan> {
    let config = &ctx.accounts.config;
    let budget = config.resolve_budget(precision_budget)?;

    let pool = PoolAccounts::load(&ctx.accounts.pool, &ctx.accounts.fee_tier, &config.amm_program)?;
    let ticks = pool.load_tick_set(ctx.remaining_accounts, &config.amm_program)?;
    let snapshot = pool.snapshot();
    require!(
        is_valid_tick(tick_lower, snapshot.tick_spacing)
            && is_valid_tick(tick_upper, snapshot.tick_spacing),
        RebalanceError::InvalidRange
    );
    let quoter = PoolQuoter::new(&snapshot, &ticks);

    msg!(
        "Rebalance deposit: range [{}, {}], tick {}, balances ({}, {}), budget {}",
        tick_lower,
        tick_upper,
        snapshot.tick_current,
        balance_a,
        balance_b,
        budget
    );

    let decision = solve_deposit(
        &quoter,
        &snapshot,
        tick_lower,
        tick_upper,
        balance_a,
        balance_b,
        budget,
    )?;
    let projection = project_deposit(
        &quoter,
        &snapshot,
        &TickRange::new(tick_lower, tick_upper)?,
        BalancePair::new(balance_a, balance_b),
        &decision,
    )?;

    msg!(
        "Swap {} {:?}, liquidity {}, dust ({}, {})",
        decision.swap_amount,
        decision.swap_direction,
        projection.liquidity,
        projection.dust_a,
        projection.dust_b
    );

    Ok(DepositPlan {
        decision,
        projection,
    })
}
