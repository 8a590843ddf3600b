use anchor_lang::prelude::*;

/// SuniSwap Rebalance Error Codes
#[error_code]
pub enum RebalanceError {
    // ═══════════════════════════════════════════════════════════════════════
    // MATH ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in checked operation
    #[msg("Math overflow")]
    MathOverflow, // 6000

    /// Division by zero attempted
    #[msg("Division by zero")]
    DivisionByZero, // 6001

    /// Result doesn't fit in expected type
    #[msg("Cast overflow")]
    CastOverflow, // 6002

    /// Multiplication overflow in Q64.64 math
    #[msg("Multiplication overflow in fixed-point math")]
    MulDivOverflow, // 6003

    /// Liquidity went negative or past u128 while crossing a tick
    #[msg("Liquidity net overflow")]
    LiquidityNetOverflow, // 6004

    // ═══════════════════════════════════════════════════════════════════════
    // TICK / PRICE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick is below minimum allowed
    #[msg("Tick below minimum")]
    TickBelowMinimum, // 6005

    /// Tick is above maximum allowed
    #[msg("Tick above maximum")]
    TickAboveMaximum, // 6006

    /// Sqrt price is below minimum
    #[msg("Sqrt price below minimum")]
    SqrtPriceBelowMinimum, // 6007

    /// Sqrt price is above maximum
    #[msg("Sqrt price above maximum")]
    SqrtPriceAboveMaximum, // 6008

    // ═══════════════════════════════════════════════════════════════════════
    // SOLVER ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Lower tick must be strictly less than upper tick
    #[msg("Lower tick must be less than upper tick")]
    InvalidRange, // 6009

    /// Precision budget must allow at least one probe
    #[msg("Precision budget must be positive")]
    InvalidBudget, // 6010

    /// Precision budget above the configured maximum
    #[msg("Precision budget exceeds maximum")]
    BudgetExceedsMaximum, // 6011

    /// The pool cannot fill the quoted input amount
    #[msg("Quote unavailable")]
    QuoteUnavailable, // 6012

    /// Not even the first probe could be quoted
    #[msg("No liquidity for swap")]
    NoLiquidityForSwap, // 6013

    // ═══════════════════════════════════════════════════════════════════════
    // REGISTRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Position identifier does not resolve
    #[msg("Position not found")]
    PositionNotFound, // 6014

    /// No pool for the token pair and fee rate
    #[msg("Pool not found")]
    PoolNotFound, // 6015

    /// Position belongs to a different pool
    #[msg("Position pool mismatch")]
    PositionPoolMismatch, // 6016

    /// Pool is paused
    #[msg("Pool is paused")]
    PoolPaused, // 6017

    /// Token is not one of the pool's mints
    #[msg("Invalid token mint")]
    InvalidTokenMint, // 6018

    /// Fee rate or fee tier account doesn't match the pool
    #[msg("Invalid fee tier")]
    InvalidFeeTier, // 6019

    // ═══════════════════════════════════════════════════════════════════════
    // ACCOUNT ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// AMM account is not owned by the configured AMM program
    #[msg("Invalid account owner")]
    InvalidAccountOwner, // 6020

    /// Account data is too short or has the wrong discriminator
    #[msg("Invalid account data")]
    InvalidAccountData, // 6021

    /// Tick array belongs to another pool
    #[msg("Invalid tick array")]
    InvalidTickArray, // 6022

    /// Signer is not the config authority
    #[msg("Unauthorized")]
    Unauthorized, // 6023
}
