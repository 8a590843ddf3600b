//! Tick Math
//!
//! Converts between tick indices and sqrt prices.
//! Based on Uniswap V3's TickMath library.
//!
//! tick = log_{1.0001}(price) = log(price) / log(1.0001)
//! sqrt_price = sqrt(1.0001^tick) = 1.0001^(tick/2)

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::RebalanceError;
use crate::math::full_math::{to_u128, U256};
use anchor_lang::prelude::*;

/// 1 / sqrt(1.0001)^(2^i) in Q128.128, for i = 1..=18
const INVERSE_SQRT_POWERS: [(u32, u128); 18] = [
    (0x2, 0xfff97272373d413259a46990580e213a),
    (0x4, 0xfff2e50f5f656932ef12357cf3c7fdcc),
    (0x8, 0xffe5caca7e10e4e61c3624eaa0941cd0),
    (0x10, 0xffcb9843d60f6159c9db58835c926644),
    (0x20, 0xff973b41fa98c081472e6896dfb254c0),
    (0x40, 0xff2ea16466c96a3843ec78b326b52861),
    (0x80, 0xfe5dee046a99a2a811c461f1969c3053),
    (0x100, 0xfcbe86c7900a88aedcffc83b479aa3a4),
    (0x200, 0xf987a7253ac413176f2b074cf7815e54),
    (0x400, 0xf3392b0822b70005940c7a398e4b70f3),
    (0x800, 0xe7159475a2c29b7443b29c7fa6e889d9),
    (0x1000, 0xd097f3bdfd2022b8845ad8f792aa5825),
    (0x2000, 0xa9f746462d870fdf8a65dc1f90e061e5),
    (0x4000, 0x70d869a156d2a1b890bb3df62baf32f7),
    (0x8000, 0x31be135f97d08fd981231505542fcfa6),
    (0x10000, 0x9aa508b5b7a84e1c677de54f3e99bc9),
    (0x20000, 0x5d6af8dedb81196699c329225ee604),
    (0x40000, 0x2216e584f5fa1ea926041bedfe98),
];

/// Get sqrt price at a given tick
/// sqrt_price_x64 = sqrt(1.0001^tick) * 2^64
///
/// Uses binary representation of tick to compute efficiently:
/// 1.0001^tick = product of 1.0001^(2^i) for each bit i set in tick
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128> {
    if tick < MIN_TICK {
        return Err(RebalanceError::TickBelowMinimum.into());
    }
    if tick > MAX_TICK {
        return Err(RebalanceError::TickAboveMaximum.into());
    }

    let abs_tick = tick.unsigned_abs();

    // ratio = 1 / sqrt(1.0001)^|tick| in Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(0xfffcb933bd6fad37aa2d162d1a594001u128)
    } else {
        U256::one() << 128
    };

    for (bit, multiplier) in INVERSE_SQRT_POWERS {
        if abs_tick & bit != 0 {
            ratio = (ratio * U256::from(multiplier)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.64, rounding up so get_tick_at_sqrt_price stays consistent
    let mask = U256::from(u64::MAX);
    let round = if (ratio & mask).is_zero() { 0 } else { 1 };
    to_u128((ratio >> 64) + U256::from(round))
}

/// Get tick at a given sqrt price
/// Returns the greatest tick whose sqrt price is <= sqrt_price_x64
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32> {
    if sqrt_price_x64 < MIN_SQRT_PRICE_X64 {
        return Err(RebalanceError::SqrtPriceBelowMinimum.into());
    }
    if sqrt_price_x64 > MAX_SQRT_PRICE_X64 {
        return Err(RebalanceError::SqrtPriceAboveMaximum.into());
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_price_at_tick(mid)? <= sqrt_price_x64 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

/// Check if a tick is valid for the given tick spacing
pub fn is_valid_tick(tick: i32, tick_spacing: u16) -> bool {
    tick_spacing > 0
        && (MIN_TICK..=MAX_TICK).contains(&tick)
        && tick % (tick_spacing as i32) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;

    #[test]
    fn test_sqrt_price_at_tick_zero() {
        assert_eq!(get_sqrt_price_at_tick(0).unwrap(), Q64);
    }

    #[test]
    fn test_tick_bounds() {
        assert!(get_sqrt_price_at_tick(MIN_TICK).is_ok());
        assert!(get_sqrt_price_at_tick(MAX_TICK).is_ok());

        assert_eq!(
            get_sqrt_price_at_tick(MIN_TICK - 1).unwrap_err(),
            RebalanceError::TickBelowMinimum.into()
        );
        assert_eq!(
            get_sqrt_price_at_tick(MAX_TICK + 1).unwrap_err(),
            RebalanceError::TickAboveMaximum.into()
        );
    }

    #[test]
    fn test_bound_prices_are_close_to_constants() {
        let min = get_sqrt_price_at_tick(MIN_TICK).unwrap();
        let max = get_sqrt_price_at_tick(MAX_TICK).unwrap();
        assert!((min as f64 / MIN_SQRT_PRICE_X64 as f64 - 1.0).abs() < 1e-6);
        assert!((max as f64 / MAX_SQRT_PRICE_X64 as f64 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sqrt_prices_at_various_ticks() {
        let q64 = Q64 as f64;

        // tick 200: price = 1.0001^200, sqrt = 1.0001^100
        let sp_200 = get_sqrt_price_at_tick(200).unwrap() as f64 / q64;
        assert!((sp_200 - 1.0001f64.powi(100)).abs() < 1e-12);

        let sp_neg200 = get_sqrt_price_at_tick(-200).unwrap() as f64 / q64;
        assert!((sp_neg200 - 1.0001f64.powi(-100)).abs() < 1e-12);

        let sp_6900 = get_sqrt_price_at_tick(6900).unwrap() as f64 / q64;
        assert!((sp_6900 - 1.0001f64.powf(3450.0)).abs() < 1e-9);
    }

    #[test]
    fn test_sqrt_price_is_strictly_increasing() {
        let mut previous = get_sqrt_price_at_tick(-1000).unwrap();
        for tick in -999..=1000 {
            let current = get_sqrt_price_at_tick(tick).unwrap();
            assert!(current > previous, "tick {tick}");
            previous = current;
        }
    }

    #[test]
    fn test_tick_at_sqrt_price_roundtrip() {
        for tick in [-443000, -6000, -1, 0, 1, 59, 6900, 443000] {
            let sqrt_price = get_sqrt_price_at_tick(tick).unwrap();
            assert_eq!(get_tick_at_sqrt_price(sqrt_price).unwrap(), tick);
            assert_eq!(get_tick_at_sqrt_price(sqrt_price + 1).unwrap(), tick);
        }
        let between = get_sqrt_price_at_tick(11).unwrap() - 1;
        assert_eq!(get_tick_at_sqrt_price(between).unwrap(), 10);
    }

    #[test]
    fn test_tick_spacing_validation() {
        assert!(is_valid_tick(60, 60));
        assert!(is_valid_tick(-60, 60));
        assert!(!is_valid_tick(61, 60));
        assert!(!is_valid_tick(60, 0));
    }
}
