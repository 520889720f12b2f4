// Pool Constants
// Q64.96 sqrt prices, Q128.128 fee growth, 1.0001 tick base

use crate::math::u256::U256;

/// Minimum tick index, log base sqrt(1.0001) of 2^-128
pub const MIN_TICK: i32 = -887272;

/// Maximum tick index, log base sqrt(1.0001) of 2^128
pub const MAX_TICK: i32 = -MIN_TICK;

/// Number of fractional bits in a sqrt price
pub const RESOLUTION: u32 = 96;

/// Fee denominator (1_000_000 = 100%, fees are in hundredths of a bip)
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Exclusive upper bound on tick spacing
pub const MAX_TICK_SPACING: i32 = 16384;

/// Minimum sqrt price, get_sqrt_ratio_at_tick(MIN_TICK)
pub const MIN_SQRT_RATIO: U256 = U256([4295128739, 0, 0, 0]);

/// Maximum sqrt price, get_sqrt_ratio_at_tick(MAX_TICK)
/// 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO: U256 = U256([0x5d951d5263988d26, 0xefd1fc6a50648849, 0xfffd8963, 0]);

/// 2^96
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// 2^128
pub const Q128: U256 = U256([0, 0, 1, 0]);

/// 2^160 - 1, the seconds-per-liquidity accumulator wraps at this width
pub const MASK_160: U256 = U256([u64::MAX, u64::MAX, 0xffffffff, 0]);

/// Standard fee tiers
pub mod fee_tiers {
    /// 0.01% fee, tick spacing 1
    pub const FEE_TIER_100: u32 = 100;
    pub const TICK_SPACING_100: i32 = 1;

    /// 0.05% fee, tick spacing 10
    pub const FEE_TIER_500: u32 = 500;
    pub const TICK_SPACING_500: i32 = 10;

    /// 0.30% fee, tick spacing 60
    pub const FEE_TIER_3000: u32 = 3000;
    pub const TICK_SPACING_3000: i32 = 60;

    /// 1.00% fee, tick spacing 200
    pub const FEE_TIER_10000: u32 = 10000;
    pub const TICK_SPACING_10000: i32 = 200;
}

/// Protocol fee split bounds
pub mod protocol_fee {
    /// Smallest enabled denominator (25% of the swap fee)
    pub const MIN_DENOMINATOR: u8 = 4;
    /// Largest enabled denominator (10% of the swap fee)
    pub const MAX_DENOMINATOR: u8 = 10;
}

/// Oracle constants
pub mod oracle {
    /// Initial observation cardinality
    pub const OBSERVATION_CARDINALITY_INIT: u16 = 1;
}
