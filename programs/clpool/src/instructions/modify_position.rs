use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::{PoolError, RangeError, Result};
use crate::ledger::TokenLedger;
use crate::math::sqrt_price_math::{get_amount0_delta_signed, get_amount1_delta_signed};
use crate::math::tick_math::{get_sqrt_ratio_at_tick, is_valid_tick};
use crate::state::pool::Pool;
use crate::state::position::Position;
use crate::state::tick::{Tick, TickGlobals};
use crate::types::{Address, PositionKey};

impl<L: TokenLedger + Clone> Pool<L> {
    /// Validate a position range against the tick bounds and spacing
    pub(crate) fn check_ticks(&self, tick_lower: i32, tick_upper: i32) -> Result<()> {
        if tick_lower >= tick_upper {
            return Err(PoolError::range(RangeError::LowerNotBelowUpper));
        }
        if tick_lower < MIN_TICK {
            return Err(PoolError::range(RangeError::LowerBelowMin));
        }
        if tick_upper > MAX_TICK {
            return Err(PoolError::range(RangeError::UpperAboveMax));
        }
        let spacing = self.config.tick_spacing;
        if !is_valid_tick(tick_lower, spacing) || !is_valid_tick(tick_upper, spacing) {
            return Err(PoolError::range(RangeError::NotOnSpacing));
        }
        Ok(())
    }

    /// Apply a liquidity delta to both bound ticks and the position
    ///
    /// Ticks snapshot their outside values when first initialized, and are
    /// cleared again when a burn leaves them without gross liquidity.
    pub(crate) fn update_position(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> Result<Position> {
        let key = PositionKey::new(owner, tick_lower, tick_upper);
        let tick_current = self.state.tick;
        let fee_growth_global0_x128 = self.state.fee_growth_global0_x128;
        let fee_growth_global1_x128 = self.state.fee_growth_global1_x128;
        let spacing = self.config.tick_spacing;

        let mut flipped_lower = false;
        let mut flipped_upper = false;
        if liquidity_delta != 0 {
            let time = self.clock.now();
            let (tick_cumulative, seconds_per_liquidity_cumulative_x128) = self
                .state
                .oracle
                .observe_single(time, 0, tick_current, self.state.liquidity)?;
            let globals = TickGlobals {
                fee_growth_global0_x128,
                fee_growth_global1_x128,
                seconds_per_liquidity_cumulative_x128,
                tick_cumulative,
                time,
            };

            let max_liquidity = self.max_liquidity_per_tick;
            flipped_lower = self.state.ticks.entry(tick_lower).or_default().update(
                tick_lower,
                tick_current,
                liquidity_delta,
                &globals,
                false,
                max_liquidity,
            )?;
            flipped_upper = self.state.ticks.entry(tick_upper).or_default().update(
                tick_upper,
                tick_current,
                liquidity_delta,
                &globals,
                true,
                max_liquidity,
            )?;

            if flipped_lower {
                self.state.tick_bitmap.flip_tick(tick_lower, spacing)?;
            }
            if flipped_upper {
                self.state.tick_bitmap.flip_tick(tick_upper, spacing)?;
            }
        }

        let lower = self.state.ticks.get(&tick_lower).copied().unwrap_or_default();
        let upper = self.state.ticks.get(&tick_upper).copied().unwrap_or_default();
        let (fee_growth_inside0_x128, fee_growth_inside1_x128) = Tick::get_fee_growth_inside(
            &lower,
            &upper,
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_global0_x128,
            fee_growth_global1_x128,
        );

        let mut position = self.state.positions.get(&key).copied().unwrap_or_default();
        position.update(liquidity_delta, fee_growth_inside0_x128, fee_growth_inside1_x128)?;
        self.state.positions.insert(key, position);

        // Ticks left without liquidity are no longer needed
        if liquidity_delta < 0 {
            if flipped_lower {
                self.state.ticks.remove(&tick_lower);
            }
            if flipped_upper {
                self.state.ticks.remove(&tick_upper);
            }
        }

        Ok(position)
    }

    /// Change a position's liquidity and compute the token amounts
    ///
    /// Positive amounts are owed to the pool, negative amounts are owed to
    /// the position.
    pub(crate) fn modify_position(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> Result<(Position, i128, i128)> {
        self.check_ticks(tick_lower, tick_upper)?;

        let position = self.update_position(owner, tick_lower, tick_upper, liquidity_delta)?;

        let mut amount0 = 0;
        let mut amount1 = 0;
        if liquidity_delta != 0 {
            let tick = self.state.tick;
            let sqrt_price_x96 = self.state.sqrt_price_x96;
            let sqrt_lower_x96 = get_sqrt_ratio_at_tick(tick_lower)?;
            let sqrt_upper_x96 = get_sqrt_ratio_at_tick(tick_upper)?;

            if tick < tick_lower {
                // Range is above the price: only token0 is needed
                amount0 = get_amount0_delta_signed(sqrt_lower_x96, sqrt_upper_x96, liquidity_delta)?;
            } else if tick < tick_upper {
                // In range: record the old liquidity before it changes
                let time = self.clock.now();
                let liquidity_before = self.state.liquidity;
                self.state.oracle.write(time, tick, liquidity_before)?;

                amount0 = get_amount0_delta_signed(sqrt_price_x96, sqrt_upper_x96, liquidity_delta)?;
                amount1 = get_amount1_delta_signed(sqrt_lower_x96, sqrt_price_x96, liquidity_delta)?;

                self.state.update_liquidity(liquidity_delta)?;
            } else {
                // Range is below the price: only token1 is needed
                amount1 = get_amount1_delta_signed(sqrt_lower_x96, sqrt_upper_x96, liquidity_delta)?;
            }
        }

        Ok((position, amount0, amount1))
    }
}
