use anchor_lang::prelude::*;

use crate::constants::MAX_PRECISION_BUDGET;
use crate::errors::RebalanceError;

/// Rebalance program configuration
/// PDA: ["config"]
#[account]
#[derive(Debug)]
pub struct RebalanceConfig {
    /// Authority that can update the configuration
    pub authority: Pubkey,

    /// SuniSwap pool program; every pool, position and tick array read
    /// by the solver must be owned by it
    pub amm_program: Pubkey,

    /// Bisection probes used when the caller passes no budget
    pub default_precision_budget: u8,

    /// Largest budget a caller may request
    pub max_precision_budget: u8,

    /// Bump seed for PDA derivation
    pub bump: u8,

    /// Reserved for future use
    pub _reserved: [u8; 32],
}

impl RebalanceConfig {
    pub const LEN: usize = 8 +  // discriminator
        32 +                     // authority
        32 +                     // amm_program
        1 +                      // default_precision_budget
        1 +                      // max_precision_budget
        1 +                      // bump
        32;                      // reserved

    /// Budget for one solve: the caller's request, or the default
    pub fn resolve_budget(&self, requested: Option<u8>) -> Result<u8> {
        let budget = requested.unwrap_or(self.default_precision_budget);
        require!(budget > 0, RebalanceError::InvalidBudget);
        require!(
            budget <= self.max_precision_budget,
            RebalanceError::BudgetExceedsMaximum
        );
        Ok(budget)
    }
}

/// Validate a (default, max) budget pair before storing it
pub fn validate_budgets(default_precision_budget: u8, max_precision_budget: u8) -> Result<()> {
    require!(default_precision_budget > 0, RebalanceError::InvalidBudget);
    require!(
        max_precision_budget <= MAX_PRECISION_BUDGET,
        RebalanceError::BudgetExceedsMaximum
    );
    require!(
        default_precision_budget <= max_precision_budget,
        RebalanceError::BudgetExceedsMaximum
    );
    Ok(())
}
