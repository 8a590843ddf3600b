//! SuniSwap Rebalance - single-swap rebalancing for concentrated liquidity deposits
//!
//! Given two token balances and a tick range, finds the one swap that turns
//! them into the mix a SuniSwap position over that range needs, so the
//! following mint leaves as little dust as possible.
//!
//! ## Architecture
//!
//! - **Liquidity-Ratio Model**: token A / token B mix a range needs at a price
//! - **Quote Oracle**: read-only swap simulation over the pool's tick arrays
//! - **Rebalance Solver**: bisection over the swap amount, each candidate judged
//!   at the price its own quote lands on, with a caller-chosen probe budget
//! - **Deposit / Increase**: explicit range, or the range of an existing position
//!
//! The program never swaps or mints. Decisions are returned as instruction
//! return data; the caller executes them against the pool program.

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod instructions;
pub mod math;
pub mod rebalance;
pub mod state;

use instructions::*;

declare_id!("8vAkPfXRxjTkAQZBf9yqWqvbJ2LDj5ZiYSnZzJtBQGyb");

#[program]
pub mod suniswap_rebalance {
    use super::*;

    // ═══════════════════════════════════════════════════════════════════════════
    // ADMIN INSTRUCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Initialize the rebalance configuration
    ///
    /// # Arguments
    /// * `amm_program` - SuniSwap pool program whose accounts are read
    /// * `default_precision_budget` - Probes used when a caller passes none
    /// * `max_precision_budget` - Largest budget a caller may request
    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        amm_program: Pubkey,
        default_precision_budget: u8,
        max_precision_budget: u8,
    ) -> Result<()> {
        instructions::initialize_config::handler(
            ctx,
            amm_program,
            default_precision_budget,
            max_precision_budget,
        )
    }

    /// Update the precision budgets
    /// Only the config authority can call this
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        default_precision_budget: u8,
        max_precision_budget: u8,
    ) -> Result<()> {
        instructions::update_config::handler(ctx, default_precision_budget, max_precision_budget)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REBALANCE INSTRUCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Plan the swap before opening a position over [tick_lower, tick_upper]
    ///
    /// # Arguments
    /// * `tick_lower` - Lower tick bound of the new position
    /// * `tick_upper` - Upper tick bound of the new position
    /// * `balance_a` - Token A held by the caller
    /// * `balance_b` - Token B held by the caller
    /// * `precision_budget` - Bisection probes, config default when `None`
    pub fn rebalance_deposit(
        ctx: Context<RebalanceDeposit>,
        tick_lower: i32,
        tick_upper: i32,
        balance_a: u64,
        balance_b: u64,
        precision_budget: Option<u8>,
    ) -> Result<DepositPlan> {
        instructions::rebalance_deposit::handler(
            ctx,
            tick_lower,
            tick_upper,
            balance_a,
            balance_b,
            precision_budget,
        )
    }

    /// Plan the swap before adding liquidity to an existing position
    ///
    /// # Arguments
    /// * `balance_a` - Token A held by the caller
    /// * `balance_b` - Token B held by the caller
    /// * `precision_budget` - Bisection probes, config default when `None`
    pub fn rebalance_increase(
        ctx: Context<RebalanceIncrease>,
        balance_a: u64,
        balance_b: u64,
        precision_budget: Option<u8>,
    ) -> Result<IncreasePlan> {
        instructions::rebalance_increase::handler(ctx, balance_a, balance_b, precision_budget)
    }
}
