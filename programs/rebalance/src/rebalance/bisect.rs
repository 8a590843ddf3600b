//! Bounded bisection over a monotone probe
//!
//! The root finder knows nothing about pools or ratios: it only narrows an
//! interval of u64 candidates from what a probe reports about each midpoint.

use crate::errors::RebalanceError;
use anchor_lang::prelude::*;

/// What a probe says about a candidate value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// Candidate is too small, the root lies above it
    Undershoot,
    /// Candidate is too large, the root lies below it
    Overshoot,
    /// Candidate is the root
    Exact,
    /// Candidate could not be evaluated; treated as too large
    Unavailable,
}

/// Result of a bisection run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BisectOutcome {
    /// The exact root, or the largest candidate known to undershoot it
    pub value: u64,
    /// Number of probes spent
    pub probes: u8,
}

/// Bisect `[0, upper_bound]` with at most `budget` probes
///
/// Stops early on `Exact` or once the interval cannot shrink any further.
/// Without an exact hit the lower end of the final interval is returned: it
/// never exceeds the root, only moves toward it as the budget grows, and is
/// never a candidate the probe reported `Unavailable`. An `Unavailable` first
/// probe means nothing in the interval can be evaluated and fails with
/// `NoLiquidityForSwap`.
pub fn bisect<F>(upper_bound: u64, budget: u8, mut probe: F) -> Result<BisectOutcome>
where
    F: FnMut(u64) -> Result<Probe>,
{
    require!(budget > 0, RebalanceError::InvalidBudget);

    let mut low = 0u64;
    let mut high = upper_bound;
    let mut probes = 0u8;

    while probes < budget {
        // (low + high) / 2 without overflowing at u64::MAX
        let mid = ((low as u128 + high as u128) / 2) as u64;
        probes += 1;

        match probe(mid)? {
            Probe::Exact => return Ok(BisectOutcome { value: mid, probes }),
            Probe::Undershoot => low = mid,
            Probe::Overshoot => high = mid,
            Probe::Unavailable => {
                require!(probes > 1, RebalanceError::NoLiquidityForSwap);
                high = mid;
            }
        }

        if high - low <= 1 {
            break;
        }
    }

    Ok(BisectOutcome { value: low, probes })
}
