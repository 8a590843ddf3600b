// SuniSwap Rebalance Constants
// Tick and price bounds mirror the SuniSwap pool program

/// Minimum tick index (p(i) = 1.0001^i)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (Q64.64 format)
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;

/// Maximum sqrt price (Q64.64 format)
pub const MAX_SQRT_PRICE_X64: u128 = 79226673515401279992447579055;

/// Q64 multiplier (2^64)
pub const Q64: u128 = 1 << 64;

/// Fee rates are expressed in hundredths of a bip (3000 = 0.3%)
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Number of ticks per AMM tick array
pub const TICK_ARRAY_SIZE: usize = 8;

/// Bisection probes used when the caller does not pick a budget
pub const DEFAULT_PRECISION_BUDGET: u8 = 32;

/// Hard cap on bisection probes; 64 already resolves any u64 balance to one unit
pub const MAX_PRECISION_BUDGET: u8 = 128;

/// Upper bound on swap steps a single simulated quote may take
pub const MAX_QUOTE_STEPS: usize = 64;

/// Account seeds for PDA derivation
pub mod seeds {
    pub const CONFIG_SEED: &[u8] = b"config";
}

/// Account names used for Anchor discriminators of AMM-owned accounts
pub mod amm_accounts {
    pub const POOL: &str = "Pool";
    pub const POSITION: &str = "Position";
    pub const TICK_ARRAY: &str = "TickArray";
    pub const FEE_TIER: &str = "FeeTier";
}
