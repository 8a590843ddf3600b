use anchor_lang::prelude::*;
use crate::state::{validate_budgets, RebalanceConfig};
use crate::constants::seeds;

/// Initialize the rebalance program configuration
/// This should be called once when deploying the program
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    /// The config account to initialize
    #[account(
        init,
        payer = payer,
        space = RebalanceConfig::LEN,
        seeds = [seeds::CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, RebalanceConfig>,

    /// The authority allowed to update the config
    /// CHECK: This is just stored as the authority
    pub authority: UncheckedAccount<'info>,

    /// The payer for account creation
    #[account(mut)]
    pub payer: Signer<'info>,

    /// System program
    pub system_program: Program<'info, System>,
}

/// Initialize config handler
pub fn handler(
    ctx: Context<InitializeConfig>,
    amm_program: Pubkey,
    default_precision_budget: u8,
    max_precision_budget: u8,
) -> Result<()> {
    validate_budgets(default_precision_budget, max_precision_budget)?;

    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.amm_program = amm_program;
    config.default_precision_budget = default_precision_budget;
    config.max_precision_budget = max_precision_budget;
    config.bump = ctx.bumps.config;

    msg!("Rebalance config initialized");
    msg!("Authority: {}", config.authority);
    msg!("AMM program: {}", config.amm_program);
    msg!(
        "Precision budget: default {}, max {}",
        default_precision_budget,
        max_precision_budget
    );

    Ok(())
}
