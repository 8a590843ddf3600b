use anchor_lang::prelude::*;
use crate::state::{validate_budgets, RebalanceConfig};
use crate::constants::seeds;
use crate::errors::RebalanceError;

/// Update the precision budgets
/// Only the config authority can call this
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [seeds::CONFIG_SEED],
        bump = config.bump,
        has_one = authority @ RebalanceError::Unauthorized
    )]
    pub config: Account<'info, RebalanceConfig>,

    pub authority: Signer<'info>,
}

/// Update config handler
pub fn handler(
    ctx: Context<UpdateConfig>,
    default_precision_budget: u8,
    max_precision_budget: u8,
) -> Result<()> {
    validate_budgets(default_precision_budget, max_precision_budget)?;

    let config = &mut ctx.accounts.config;
    config.default_precision_budget = default_precision_budget;
    config.max_precision_budget = max_precision_budget;

    msg!(
        "Precision budget updated: default {}, max {}",
        default_precision_budget,
        max_precision_budget
    );

    Ok(())
}
