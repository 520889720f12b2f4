//! Tick Math
//!
//! Converts between tick indices and Q64.96 sqrt prices.
//!
//! sqrt_price = sqrt(1.0001^tick) * 2^96
//! tick = floor(log_{1.0001}(sqrt_price^2 / 2^192))

use crate::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use crate::errors::{PoolError, Result};
use crate::math::bit_math::most_significant_bit;
use crate::math::u256::{from_i128, sar128_to_i32, U256};

/// 1 / sqrt(1.0001^(2^i)) in Q128.128 for i = 1..=19; bit 0 seeds the ratio
const RATIO_MULTIPLIERS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// 1 / sqrt(1.0001) in Q128.128
const RATIO_TICK_ONE: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// log_sqrt(1.0001)(2) in Q128
const LOG_SQRT_10001_MULTIPLIER: u128 = 255738958999603826347141;

/// Error bounds applied to the log estimate before flooring
const TICK_LOW_ERROR: u128 = 3402992956809132418596140100660247210;
const TICK_HI_ERROR: u128 = 291339464771989622907027621153398088495;

/// Get sqrt price (Q64.96) at a given tick
///
/// Multiplies together the precomputed ratios for each set bit of |tick|,
/// inverting for positive ticks, then rounds the Q128.128 ratio up to Q64.96.
/// The result always lies in [MIN_SQRT_RATIO, MAX_SQRT_RATIO].
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(PoolError::TickOutOfBounds);
    }
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(RATIO_TICK_ONE)
    } else {
        U256::one() << 128
    };

    for (i, multiplier) in RATIO_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (1 << (i + 1)) != 0 {
            // ratio <= 2^128 and multiplier < 2^128, so the product fits 256 bits
            ratio = (ratio * U256::from(*multiplier)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q128.96, rounding up so the tick lookup stays consistent
    let remainder = ratio & U256::from(u32::MAX);
    let sqrt_price_x96 = (ratio >> 32) + if remainder.is_zero() { 0u8 } else { 1u8 };
    Ok(sqrt_price_x96)
}

/// Get the greatest tick whose sqrt price is at or below the given sqrt price
///
/// # Errors
/// `PriceOutOfBounds` unless MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(PoolError::PriceOutOfBounds);
    }
    let ratio = sqrt_price_x96 << 32;

    let msb = most_significant_bit(ratio)? as u32;
    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // integer part of log2, then 14 fractional bits by repeated squaring
    let mut log_2: i128 = (msb as i128 - 128) << 64;
    for i in 0..14u32 {
        r = (r * r) >> 127;
        let f = r >> 128;
        if !f.is_zero() {
            log_2 |= 1i128 << (63 - i);
            r = r >> 1;
        }
    }

    let log_sqrt10001 = from_i128(log_2)
        .overflowing_mul(U256::from(LOG_SQRT_10001_MULTIPLIER))
        .0;

    let tick_low = sar128_to_i32(log_sqrt10001.overflowing_sub(U256::from(TICK_LOW_ERROR)).0);
    let tick_hi = sar128_to_i32(log_sqrt10001.overflowing_add(U256::from(TICK_HI_ERROR)).0);

    if tick_low == tick_hi {
        Ok(tick_low)
    } else if get_sqrt_ratio_at_tick(tick_hi)? <= sqrt_price_x96 {
        Ok(tick_hi)
    } else {
        Ok(tick_low)
    }
}

/// Check if a tick is valid for the given tick spacing
pub fn is_valid_tick(tick: i32, tick_spacing: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick) && tick % tick_spacing == 0
}

/// Lowest tick usable with the given spacing
pub fn get_min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

/// Highest tick usable with the given spacing
pub fn get_max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> U256 {
        U256::from_dec_str(s).unwrap()
    }

    #[test]
    fn test_tick_bounds() {
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(get_sqrt_ratio_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK - 1), Err(PoolError::TickOutOfBounds));
        assert_eq!(get_sqrt_ratio_at_tick(MAX_TICK + 1), Err(PoolError::TickOutOfBounds));
    }

    #[test]
    fn test_sqrt_ratio_near_bounds() {
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK + 1).unwrap(), U256::from(4295343490u64));
        assert_eq!(
            get_sqrt_ratio_at_tick(MAX_TICK - 1).unwrap(),
            dec("1461373636630004318706518188784493106690254656249")
        );
    }

    #[test]
    fn test_sqrt_ratio_at_tick_zero_and_fifty() {
        assert_eq!(get_sqrt_ratio_at_tick(0).unwrap(), U256::one() << 96);
        assert_eq!(get_sqrt_ratio_at_tick(50).unwrap(), dec("79426470787362580746886972461"));
    }

    #[test]
    fn test_tick_at_sqrt_ratio_bounds() {
        assert_eq!(get_tick_at_sqrt_ratio(MIN_SQRT_RATIO).unwrap(), MIN_TICK);
        assert_eq!(get_tick_at_sqrt_ratio(U256::from(4295343490u64)).unwrap(), MIN_TICK + 1);
        assert_eq!(get_tick_at_sqrt_ratio(MAX_SQRT_RATIO - 1).unwrap(), MAX_TICK - 1);
        assert_eq!(
            get_tick_at_sqrt_ratio(dec("1461373636630004318706518188784493106690254656249")).unwrap(),
            MAX_TICK - 1
        );
    }

    #[test]
    fn test_tick_at_sqrt_ratio_out_of_bounds() {
        assert_eq!(get_tick_at_sqrt_ratio(MIN_SQRT_RATIO - 1), Err(PoolError::PriceOutOfBounds));
        assert_eq!(get_tick_at_sqrt_ratio(MAX_SQRT_RATIO), Err(PoolError::PriceOutOfBounds));
    }

    #[test]
    fn test_tick_at_sqrt_ratio_floors() {
        let one = U256::one() << 96;
        assert_eq!(get_tick_at_sqrt_ratio(one).unwrap(), 0);
        assert_eq!(get_tick_at_sqrt_ratio(one - 1).unwrap(), -1);
        // sqrt(1/10)
        assert_eq!(get_tick_at_sqrt_ratio(dec("25054144837504793118641380156")).unwrap(), -23028);
        // sqrt(1/2)
        assert_eq!(get_tick_at_sqrt_ratio(dec("56022770974786139918731938227")).unwrap(), -6932);
    }

    #[test]
    fn test_usable_ticks() {
        assert_eq!(get_min_usable_tick(60), -887220);
        assert_eq!(get_max_usable_tick(60), 887220);
        assert_eq!(get_min_usable_tick(1), MIN_TICK);
        assert!(is_valid_tick(-60, 60));
        assert!(!is_valid_tick(61, 60));
        assert!(!is_valid_tick(MAX_TICK + 1, 1));
    }

    proptest! {
        #[test]
        fn prop_tick_round_trip(tick in MIN_TICK..MAX_TICK) {
            let price = get_sqrt_ratio_at_tick(tick).unwrap();
            prop_assert_eq!(get_tick_at_sqrt_ratio(price).unwrap(), tick);
        }

        #[test]
        fn prop_tick_is_floor(raw in any::<[u64; 3]>()) {
            let span = MAX_SQRT_RATIO - MIN_SQRT_RATIO;
            let price = MIN_SQRT_RATIO + U256([raw[0], raw[1], raw[2], 0]) % span;
            let tick = get_tick_at_sqrt_ratio(price).unwrap();
            prop_assert!(get_sqrt_ratio_at_tick(tick).unwrap() <= price);
            prop_assert!(get_sqrt_ratio_at_tick(tick + 1).unwrap() > price);
        }
    }
}
