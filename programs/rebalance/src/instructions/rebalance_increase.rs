use anchor_lang::prelude::*;
use crate::constants::seeds;
use crate::rebalance::{
    project_deposit, solve_increase, BalancePair, DepositProjection, IncreaseDecision, PoolQuoter,
    TickRange,
};
use crate::state::{AccountRegistry, PoolAccounts, PositionView, RebalanceConfig};

/// Plan the swap that precedes adding liquidity to an existing position
///
/// Remaining accounts: the pool's tick arrays around the current price,
/// contiguous, any order.
#[derive(Accounts)]
pub struct RebalanceIncrease<'info> {
    #[account(seeds = [seeds::CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, RebalanceConfig>,

    /// The position to increase
    /// CHECK: owner and discriminator are checked against config.amm_program
    pub position: UncheckedAccount<'info>,

    /// The pool the position belongs to
    /// CHECK: owner and discriminator are checked against config.amm_program
    pub pool: UncheckedAccount<'info>,

    /// The pool's fee tier
    /// CHECK: owner and discriminator are checked against config.amm_program
    pub fee_tier: UncheckedAccount<'info>,
}

/// Swap decision, the position it targets and the deposit it leads to
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncreasePlan {
    pub increase: IncreaseDecision,
    pub projection: DepositProjection,
}

/// Rebalance increase handler
pub fn handler(
    ctx: Context<RebalanceIncrease>,
    balance_a: u64,
    balance_b: u64,
    precision_budget: Option<u8>,
) -> Result<IncreasePlan> {
    let config = &ctx.accounts.config;
    let budget = config.resolve_budget(precision_budget)?;
    let position_key = ctx.accounts.position.key();

    let pool = PoolAccounts::load(&ctx.accounts.pool, &ctx.accounts.fee_tier, &config.amm_program)?;
    let position = PositionView::load(&ctx.accounts.position, &config.amm_program)?;
    let registry = AccountRegistry::new(position_key, position, pool)?;

    let ticks = pool.load_tick_set(ctx.remaining_accounts, &config.amm_program)?;
    let snapshot = pool.snapshot();
    let quoter = PoolQuoter::new(&snapshot, &ticks);

    msg!(
        "Rebalance increase: position {}, tick {}, balances ({}, {}), budget {}",
        position_key,
        snapshot.tick_current,
        balance_a,
        balance_b,
        budget
    );

    let increase = solve_increase(
        &registry,
        &registry,
        &quoter,
        &position_key,
        balance_a,
        balance_b,
        budget,
    )?;
    let projection = project_deposit(
        &quoter,
        &snapshot,
        &TickRange::new(increase.tick_lower, increase.tick_upper)?,
        BalancePair::new(balance_a, balance_b),
        &increase.decision,
    )?;

    msg!(
        "Range [{}, {}], fee rate {}: swap {} {:?}, liquidity {}, dust ({}, {})",
        increase.tick_lower,
        increase.tick_upper,
        increase.fee_rate,
        increase.decision.swap_amount,
        increase.decision.swap_direction,
        projection.liquidity,
        projection.dust_a,
        projection.dust_b
    );

    Ok(IncreasePlan {
        increase,
        projection,
    })
}
