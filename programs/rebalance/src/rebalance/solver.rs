//! Rebalance Solver
//!
//! Picks the single swap that turns a balance pair into the mix a position
//! over a tick range needs. The swap moves the price, and the price sets the
//! mix, so each candidate amount is judged at the price its own quote lands
//! on. The search itself is plain bisection over the source balance.

use std::cmp::Ordering;

use crate::errors::RebalanceError;
use crate::math::liquidity_math::{get_amounts_for_liquidity, get_liquidity_for_amounts};
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::rebalance::bisect::{bisect, Probe};
use crate::rebalance::oracle::{PoolSnapshot, QuoteOracle};
use crate::rebalance::ratio::{required_ratio_at_sqrt_price, LiquidityRatio};
use anchor_lang::prelude::*;

/// Which token the rebalancing swap sells
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    AToB,
    BToA,
}

impl SwapDirection {
    pub fn is_a_to_b(self) -> bool {
        matches!(self, SwapDirection::AToB)
    }

    /// (token_in, token_out) for this direction on `pool`
    pub fn tokens(self, pool: &PoolSnapshot) -> (Pubkey, Pubkey) {
        match self {
            SwapDirection::AToB => (pool.token_mint_a, pool.token_mint_b),
            SwapDirection::BToA => (pool.token_mint_b, pool.token_mint_a),
        }
    }
}

/// The solver's answer: sell `swap_amount` of the source token
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalanceDecision {
    pub swap_amount: u64,
    pub swap_direction: SwapDirection,
}

impl RebalanceDecision {
    /// Balances already fit the range
    pub fn none() -> Self {
        Self {
            swap_amount: 0,
            swap_direction: SwapDirection::AToB,
        }
    }
}

/// Validated position bounds, `tick_lower < tick_upper`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickRange {
    tick_lower: i32,
    tick_upper: i32,
}

impl TickRange {
    pub fn new(tick_lower: i32, tick_upper: i32) -> Result<Self> {
        require!(tick_lower < tick_upper, RebalanceError::InvalidRange);
        Ok(Self {
            tick_lower,
            tick_upper,
        })
    }

    pub fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    pub fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    /// Sqrt prices at (lower, upper)
    pub fn sqrt_prices(&self) -> Result<(u128, u128)> {
        Ok((
            get_sqrt_price_at_tick(self.tick_lower)?,
            get_sqrt_price_at_tick(self.tick_upper)?,
        ))
    }

    /// Required token mix at `sqrt_price_x64`
    pub fn ratio_at(&self, sqrt_price_x64: u128) -> Result<LiquidityRatio> {
        let (sqrt_price_lower_x64, sqrt_price_upper_x64) = self.sqrt_prices()?;
        required_ratio_at_sqrt_price(sqrt_price_x64, sqrt_price_lower_x64, sqrt_price_upper_x64)
    }
}

/// Caller inventory in each token's smallest unit
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalancePair {
    pub amount_a: u64,
    pub amount_b: u64,
}

impl BalancePair {
    pub fn new(amount_a: u64, amount_b: u64) -> Self {
        Self { amount_a, amount_b }
    }

    /// Balance of the token `direction` sells
    pub fn source(&self, direction: SwapDirection) -> u64 {
        match direction {
            SwapDirection::AToB => self.amount_a,
            SwapDirection::BToA => self.amount_b,
        }
    }

    /// Balances after selling `amount_in` for `amount_out`
    pub fn after_swap(&self, direction: SwapDirection, amount_in: u64, amount_out: u64) -> Result<Self> {
        let (amount_a, amount_b) = match direction {
            SwapDirection::AToB => (
                self.amount_a.checked_sub(amount_in),
                self.amount_b.checked_add(amount_out),
            ),
            SwapDirection::BToA => (
                self.amount_a.checked_add(amount_out),
                self.amount_b.checked_sub(amount_in),
            ),
        };
        Ok(Self {
            amount_a: amount_a.ok_or(RebalanceError::MathOverflow)?,
            amount_b: amount_b.ok_or(RebalanceError::MathOverflow)?,
        })
    }
}

/// Map an imbalance to a probe outcome for a search selling `direction`'s source token
fn probe_for(direction: SwapDirection, imbalance: Ordering) -> Probe {
    match (direction, imbalance) {
        (_, Ordering::Equal) => Probe::Exact,
        // Source token still overweight: sell more
        (SwapDirection::AToB, Ordering::Greater) | (SwapDirection::BToA, Ordering::Less) => {
            Probe::Undershoot
        }
        _ => Probe::Overshoot,
    }
}

/// Find the swap that leaves `balances` matching the range's ratio
///
/// The direction is fixed from the ratio at the current pool price and never
/// revisited. At most `precision_budget` quotes are requested. The amount
/// returned was either quoted successfully or is zero.
pub fn solve<Q: QuoteOracle + ?Sized>(
    oracle: &Q,
    pool: &PoolSnapshot,
    range: &TickRange,
    balances: BalancePair,
    precision_budget: u8,
) -> Result<RebalanceDecision> {
    require!(precision_budget > 0, RebalanceError::InvalidBudget);

    let (sqrt_price_lower_x64, sqrt_price_upper_x64) = range.sqrt_prices()?;
    let current = required_ratio_at_sqrt_price(
        pool.sqrt_price_x64,
        sqrt_price_lower_x64,
        sqrt_price_upper_x64,
    )?;

    let swap_direction = match current.compare_balances(balances.amount_a, balances.amount_b) {
        Ordering::Equal => return Ok(RebalanceDecision::none()),
        Ordering::Greater => SwapDirection::AToB,
        Ordering::Less => SwapDirection::BToA,
    };
    let (token_in, token_out) = swap_direction.tokens(pool);

    let outcome = bisect(balances.source(swap_direction), precision_budget, |amount| {
        if amount == 0 {
            let imbalance = current.compare_balances(balances.amount_a, balances.amount_b);
            return Ok(probe_for(swap_direction, imbalance));
        }

        let quote = match oracle.quote(&token_in, &token_out, pool.fee_rate, amount) {
            Ok(quote) => quote,
            Err(err) if err == RebalanceError::QuoteUnavailable.into() => {
                return Ok(Probe::Unavailable)
            }
            Err(err) => return Err(err),
        };

        let after = balances.after_swap(swap_direction, amount, quote.amount_out)?;
        let target = required_ratio_at_sqrt_price(
            quote.sqrt_price_after_x64,
            sqrt_price_lower_x64,
            sqrt_price_upper_x64,
        )?;
        Ok(probe_for(
            swap_direction,
            target.compare_balances(after.amount_a, after.amount_b),
        ))
    })?;

    Ok(RebalanceDecision {
        swap_amount: outcome.value,
        swap_direction,
    })
}

/// What a deposit looks like once the chosen swap has executed
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositProjection {
    /// Output of the rebalancing swap
    pub amount_out: u64,
    /// Pool price after the swap
    pub sqrt_price_after_x64: u128,
    /// Liquidity mintable from the post-swap balances
    pub liquidity: u128,
    /// Token A the mint consumes
    pub amount_a: u64,
    /// Token B the mint consumes
    pub amount_b: u64,
    /// Token A left over
    pub dust_a: u64,
    /// Token B left over
    pub dust_b: u64,
}

/// Re-quote `decision` and project the mint that follows it
pub fn project_deposit<Q: QuoteOracle + ?Sized>(
    oracle: &Q,
    pool: &PoolSnapshot,
    range: &TickRange,
    balances: BalancePair,
    decision: &RebalanceDecision,
) -> Result<DepositProjection> {
    let (amount_out, sqrt_price_after_x64) = if decision.swap_amount == 0 {
        (0, pool.sqrt_price_x64)
    } else {
        let (token_in, token_out) = decision.swap_direction.tokens(pool);
        let quote = oracle.quote(&token_in, &token_out, pool.fee_rate, decision.swap_amount)?;
        (quote.amount_out, quote.sqrt_price_after_x64)
    };
    let after = balances.after_swap(decision.swap_direction, decision.swap_amount, amount_out)?;

    let (sqrt_price_lower_x64, sqrt_price_upper_x64) = range.sqrt_prices()?;
    let liquidity = get_liquidity_for_amounts(
        sqrt_price_after_x64,
        sqrt_price_lower_x64,
        sqrt_price_upper_x64,
        after.amount_a,
        after.amount_b,
    )?;
    let (amount_a, amount_b) = get_amounts_for_liquidity(
        sqrt_price_after_x64,
        sqrt_price_lower_x64,
        sqrt_price_upper_x64,
        liquidity,
        true,
    )?;
    // Rounding up may ask for one unit more than is held
    let amount_a = amount_a.min(after.amount_a);
    let amount_b = amount_b.min(after.amount_b);

    Ok(DepositProjection {
        amount_out,
        sqrt_price_after_x64,
        liquidity,
        amount_a,
        amount_b,
        dust_a: after.amount_a - amount_a,
        dust_b: after.amount_b - amount_b,
    })
}

/// Deposit variant: explicit range, fresh position
pub fn solve_deposit<Q: QuoteOracle + ?Sized>(
    oracle: &Q,
    pool: &PoolSnapshot,
    tick_lower: i32,
    tick_upper: i32,
    balance_a: u64,
    balance_b: u64,
    precision_budget: u8,
) -> Result<RebalanceDecision> {
    let range = TickRange::new(tick_lower, tick_upper)?;
    solve(
        oracle,
        pool,
        &range,
        BalancePair::new(balance_a, balance_b),
        precision_budget,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_tick_at_sqrt_price;
    use crate::rebalance::oracle::PoolQuoter;
    use crate::rebalance::testing::{pool_at, position_ticks, FixedPriceOracle};
    use proptest::prelude::*;

    fn balances(a: u64, b: u64) -> BalancePair {
        BalancePair::new(a, b)
    }

    #[test]
    fn test_single_sided_a_swaps_half_on_symmetric_range() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let decision = solve_deposit(&oracle, &pool, -6000, 6000, 1000, 0, 32).unwrap();

        assert_eq!(decision.swap_direction, SwapDirection::AToB);
        assert!(decision.swap_amount.abs_diff(500) <= 1);
    }

    #[test]
    fn test_matched_balances_need_no_swap() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let decision = solve_deposit(&oracle, &pool, -6000, 6000, 500, 500, 32).unwrap();

        // within one bisection step of zero
        assert!(decision.swap_amount <= 1);
    }

    #[test]
    fn test_one_sided_balance_at_boundary_needs_no_swap() {
        // price below the range: only token A is wanted
        let pool = pool_at(-7000, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let decision = solve_deposit(&oracle, &pool, -6000, 6900, 1000, 0, 32).unwrap();
        assert_eq!(decision, RebalanceDecision::none());
        assert_eq!(oracle.calls.get(), 0);
    }

    #[test]
    fn test_zero_a_in_range_swaps_b_to_a() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let decision = solve_deposit(&oracle, &pool, -6000, 6900, 0, 100, 32).unwrap();

        assert_eq!(decision.swap_direction, SwapDirection::BToA);
        assert!(decision.swap_amount > 0);
        assert!(decision.swap_amount <= 100);
    }

    #[test]
    fn test_price_above_range_sells_all_a() {
        let pool = pool_at(7000, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let decision = solve_deposit(&oracle, &pool, -6000, 6900, 1000, 0, 32).unwrap();

        assert_eq!(decision.swap_direction, SwapDirection::AToB);
        assert!(decision.swap_amount >= 999);
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        assert_eq!(
            solve_deposit(&oracle, &pool, 100, 100, 1000, 0, 32).unwrap_err(),
            RebalanceError::InvalidRange.into()
        );
        assert_eq!(
            solve_deposit(&oracle, &pool, 200, 100, 1000, 0, 32).unwrap_err(),
            RebalanceError::InvalidRange.into()
        );
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        assert_eq!(
            solve_deposit(&oracle, &pool, -6000, 6900, 1000, 0, 0).unwrap_err(),
            RebalanceError::InvalidBudget.into()
        );
    }

    #[test]
    fn test_unavailable_quotes_shrink_the_search() {
        // above the range the root is the whole balance, but only 800 can be quoted
        let pool = pool_at(7000, 0);
        let mut oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        oracle.max_amount = 800;
        let decision = solve_deposit(&oracle, &pool, -6000, 6900, 1000, 0, 32).unwrap();

        assert_eq!(decision, RebalanceDecision { swap_amount: 800, swap_direction: SwapDirection::AToB });

        let (token_in, token_out) = decision.swap_direction.tokens(&pool);
        assert!(oracle.quote(&token_in, &token_out, pool.fee_rate, decision.swap_amount).is_ok());
        let range = TickRange::new(-6000, 6900).unwrap();
        let projection = project_deposit(&oracle, &pool, &range, balances(1000, 0), &decision).unwrap();
        assert_eq!(projection.dust_a, 200);
    }

    #[test]
    fn test_no_liquidity_at_first_probe() {
        let pool = pool_at(0, 0);
        let mut oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        oracle.max_amount = 0;
        assert_eq!(
            solve_deposit(&oracle, &pool, -6000, 6000, 1000, 0, 32).unwrap_err(),
            RebalanceError::NoLiquidityForSwap.into()
        );
    }

    #[test]
    fn test_reference_example_against_pool() {
        // range [-6000, 6900] at tick 0 holding only token A
        let liquidity = 1_000_000_000_000u128;
        let pool = pool_at(0, liquidity);
        let ticks = position_ticks(-60_000, 60_000, liquidity);
        let quoter = PoolQuoter::new(&pool, &ticks);
        let range = TickRange::new(-6000, 6900).unwrap();

        let decision = solve(&quoter, &pool, &range, balances(1_000_000, 0), 32).unwrap();
        assert_eq!(decision.swap_direction, SwapDirection::AToB);
        assert!(decision.swap_amount > 0 && decision.swap_amount < 1_000_000);

        let projection = project_deposit(&quoter, &pool, &range, balances(1_000_000, 0), &decision).unwrap();
        assert!(projection.liquidity > 0);
        assert!(projection.dust_a <= 4, "dust_a = {}", projection.dust_a);
        assert!(projection.dust_b <= 4, "dust_b = {}", projection.dust_b);
    }

    #[test]
    fn test_post_swap_price_sets_the_target() {
        // shallow pool: the swap itself pushes the price, so the decision differs
        // from the one a fixed-price oracle would give
        let liquidity = 2_000_000u128;
        let pool = pool_at(0, liquidity);
        let ticks = position_ticks(-60_000, 60_000, liquidity);
        let quoter = PoolQuoter::new(&pool, &ticks);
        let range = TickRange::new(-6000, 6000).unwrap();

        let decision = solve(&quoter, &pool, &range, balances(1_000_000, 0), 40).unwrap();
        let projection = project_deposit(&quoter, &pool, &range, balances(1_000_000, 0), &decision).unwrap();

        let tick_after = get_tick_at_sqrt_price(projection.sqrt_price_after_x64).unwrap();
        assert!(tick_after < 0);
        assert!(decision.swap_amount < 500_000);
        // one unit of swap moves the target by a few units in a pool this shallow
        assert!(projection.dust_a <= 10 && projection.dust_b <= 10, "{projection:?}");
    }

    #[test]
    fn test_project_without_swap() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let range = TickRange::new(-6000, 6000).unwrap();
        let projection =
            project_deposit(&oracle, &pool, &range, balances(500, 500), &RebalanceDecision::none()).unwrap();

        assert_eq!(projection.amount_out, 0);
        assert_eq!(projection.sqrt_price_after_x64, pool.sqrt_price_x64);
        assert!(projection.dust_a <= 1 && projection.dust_b <= 1);
        assert_eq!(oracle.calls.get(), 0);
    }

    #[test]
    fn test_budget_tightens_the_answer() {
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let coarse = solve_deposit(&oracle, &pool, -6000, 6000, 1_000_000, 0, 4).unwrap();
        let fine = solve_deposit(&oracle, &pool, -6000, 6000, 1_000_000, 0, 32).unwrap();

        assert!(coarse.swap_amount.abs_diff(500_000) <= 1_000_000 / 16 + 1);
        assert!(fine.swap_amount.abs_diff(500_000) <= 1);
    }

    #[test]
    fn test_larger_budget_never_moves_away() {
        // equilibrium near 499; midpoints on the way overshoot it
        let pool = pool_at(0, 0);
        let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
        let exact = solve_deposit(&oracle, &pool, -6000, 6000, 999, 0, 64).unwrap().swap_amount;

        let mut previous_error = u64::MAX;
        for budget in 1..=12 {
            let decision = solve_deposit(&oracle, &pool, -6000, 6000, 999, 0, budget).unwrap();
            let error = decision.swap_amount.abs_diff(exact);
            assert!(error <= previous_error, "budget {budget}: error {error} > {previous_error}");
            previous_error = error;
        }
        assert!(previous_error <= 1);
    }

    proptest! {
        #[test]
        fn prop_more_budget_never_worse(
            tick in -5_000i32..5_000,
            a in 1u64..1_000_000_000_000_000_000,
            b in 0u64..1_000_000_000_000_000_000,
            budget in 1u8..=63,
        ) {
            let pool = pool_at(tick, 0);
            let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
            let exact = solve_deposit(&oracle, &pool, -6000, 6900, a, b, 64).unwrap();
            let coarse = solve_deposit(&oracle, &pool, -6000, 6900, a, b, budget).unwrap();
            let fine = solve_deposit(&oracle, &pool, -6000, 6900, a, b, budget + 1).unwrap();

            prop_assert!(coarse.swap_amount <= exact.swap_amount);
            prop_assert!(
                fine.swap_amount.abs_diff(exact.swap_amount)
                    <= coarse.swap_amount.abs_diff(exact.swap_amount)
            );
        }

        #[test]
        fn prop_decision_respects_source_and_budget(
            tick in -5_000i32..5_000,
            a in 0u64..1_000_000_000_000_000_000,
            b in 0u64..1_000_000_000_000_000_000,
            budget in 1u8..=64,
        ) {
            let pool = pool_at(tick, 0);
            let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
            let decision = solve_deposit(&oracle, &pool, -6000, 6900, a, b, budget).unwrap();

            let source = match decision.swap_direction {
                SwapDirection::AToB => a,
                SwapDirection::BToA => b,
            };
            prop_assert!(decision.swap_amount <= source);
            prop_assert!(oracle.calls.get() <= budget as u32);

            // same inputs, same direction
            let again = solve_deposit(&oracle, &pool, -6000, 6900, a, b, budget).unwrap();
            prop_assert_eq!(again.swap_direction, decision.swap_direction);
        }

        #[test]
        fn prop_zero_source_never_chosen(
            tick in -5_000i32..5_000,
            amount in 1u64..1_000_000_000_000_000_000,
            a_side in any::<bool>(),
        ) {
            let pool = pool_at(tick, 0);
            let oracle = FixedPriceOracle::at(pool.sqrt_price_x64);
            let (a, b) = if a_side { (amount, 0) } else { (0, amount) };
            let decision = solve_deposit(&oracle, &pool, -6000, 6900, a, b, 32).unwrap();
            let expected = if a_side { SwapDirection::AToB } else { SwapDirection::BToA };
            prop_assert_eq!(decision.swap_direction, expected);
        }
    }
}
