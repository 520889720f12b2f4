use std::collections::HashMap;

use crate::constants::MASK_160;
use crate::errors::{PoolError, Result};
use crate::math::liquidity_math::add_delta;
use crate::math::u256::{wrapping_sub, U256};

/// Sparse tick storage keyed by tick index
pub type TickMap = HashMap<i32, Tick>;

/// Global accumulators a tick snapshots when initialized below the price
/// or flipped when the price crosses it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickGlobals {
    pub fee_growth_global0_x128: U256,
    pub fee_growth_global1_x128: U256,
    pub seconds_per_liquidity_cumulative_x128: U256,
    pub tick_cumulative: i64,
    pub time: u32,
}

/// Tick data
/// Each tick represents a price point where liquidity can change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    /// Total liquidity referencing this tick
    /// Used to track when tick can be uninitialized
    pub liquidity_gross: u128,

    /// Net liquidity change when crossing this tick left to right
    /// When price moves up through tick: add liquidity_net
    /// When price moves down through tick: subtract liquidity_net
    pub liquidity_net: i128,

    /// Fee growth on the other side of this tick (token0)
    /// Meaning is relative to the current tick
    pub fee_growth_outside0_x128: U256,

    /// Fee growth on the other side of this tick (token1)
    pub fee_growth_outside1_x128: U256,

    /// Cumulative tick value on the other side of this tick
    pub tick_cumulative_outside: i64,

    /// Seconds per liquidity on the other side of this tick, mod 2^160
    pub seconds_per_liquidity_outside_x128: U256,

    /// Seconds spent on the other side of this tick
    pub seconds_outside: u32,

    /// True iff liquidity_gross != 0
    pub initialized: bool,
}

impl Tick {
    /// Update tick when liquidity is added/removed
    ///
    /// Returns true when the tick flipped between initialized and
    /// uninitialized, so the caller can toggle the bitmap.
    ///
    /// # Errors
    /// `LiquidityOverflow` if gross liquidity underflows or exceeds
    /// `max_liquidity`, or net liquidity leaves the i128 range
    pub fn update(
        &mut self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        globals: &TickGlobals,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<bool> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

        if liquidity_gross_after > max_liquidity {
            return Err(PoolError::LiquidityOverflow);
        }

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        if liquidity_gross_before == 0 {
            // By convention, we assume all growth before initialization happened below the tick
            if tick <= tick_current {
                self.fee_growth_outside0_x128 = globals.fee_growth_global0_x128;
                self.fee_growth_outside1_x128 = globals.fee_growth_global1_x128;
                self.seconds_per_liquidity_outside_x128 =
                    globals.seconds_per_liquidity_cumulative_x128;
                self.tick_cumulative_outside = globals.tick_cumulative;
                self.seconds_outside = globals.time;
            }
            self.initialized = true;
        }

        self.liquidity_gross = liquidity_gross_after;

        // When price moves up: lower adds liquidity, upper removes
        self.liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(PoolError::LiquidityOverflow)?;

        Ok(flipped)
    }

    /// Cross a tick when price moves through it
    ///
    /// Every outside value flips to the other side. Returns the liquidity
    /// net to apply in the left-to-right direction.
    pub fn cross(&mut self, globals: &TickGlobals) -> i128 {
        self.fee_growth_outside0_x128 =
            wrapping_sub(globals.fee_growth_global0_x128, self.fee_growth_outside0_x128);
        self.fee_growth_outside1_x128 =
            wrapping_sub(globals.fee_growth_global1_x128, self.fee_growth_outside1_x128);
        self.seconds_per_liquidity_outside_x128 = wrapping_sub(
            globals.seconds_per_liquidity_cumulative_x128,
            self.seconds_per_liquidity_outside_x128,
        ) & MASK_160;
        self.tick_cumulative_outside = globals
            .tick_cumulative
            .wrapping_sub(self.tick_cumulative_outside);
        self.seconds_outside = globals.time.wrapping_sub(self.seconds_outside);
        self.liquidity_net
    }

    /// Calculate fee growth inside a tick range
    ///
    /// Missing ticks are passed as `Tick::default()`.
    pub fn get_fee_growth_inside(
        tick_lower: &Tick,
        tick_upper: &Tick,
        tick_lower_index: i32,
        tick_upper_index: i32,
        tick_current: i32,
        fee_growth_global0_x128: U256,
        fee_growth_global1_x128: U256,
    ) -> (U256, U256) {
        // Calculate fee growth below lower tick
        let (fee_growth_below0, fee_growth_below1) = if tick_current >= tick_lower_index {
            (tick_lower.fee_growth_outside0_x128, tick_lower.fee_growth_outside1_x128)
        } else {
            (
                wrapping_sub(fee_growth_global0_x128, tick_lower.fee_growth_outside0_x128),
                wrapping_sub(fee_growth_global1_x128, tick_lower.fee_growth_outside1_x128),
            )
        };

        // Calculate fee growth above upper tick
        let (fee_growth_above0, fee_growth_above1) = if tick_current < tick_upper_index {
            (tick_upper.fee_growth_outside0_x128, tick_upper.fee_growth_outside1_x128)
        } else {
            (
                wrapping_sub(fee_growth_global0_x128, tick_upper.fee_growth_outside0_x128),
                wrapping_sub(fee_growth_global1_x128, tick_upper.fee_growth_outside1_x128),
            )
        };

        (
            wrapping_sub(
                wrapping_sub(fee_growth_global0_x128, fee_growth_below0),
                fee_growth_above0,
            ),
            wrapping_sub(
                wrapping_sub(fee_growth_global1_x128, fee_growth_below1),
                fee_growth_above1,
            ),
        )
    }
}
