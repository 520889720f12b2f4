use crate::constants::MASK_160;
use crate::errors::{PoolError, Result};
use crate::ledger::TokenLedger;
use crate::math::u256::{wrapping_sub, U256};
use crate::state::pool::Pool;

impl<L: TokenLedger + Clone> Pool<L> {
    /// Cumulative tick and seconds-per-liquidity as of each `seconds_agos` ago
    ///
    /// Lookbacks may reach at most the oldest observation still in the ring.
    ///
    /// # Errors
    /// `ObservationNotAvailable` for lookbacks older than the ring
    pub fn observe(&self, seconds_agos: &[u32]) -> Result<(Vec<i64>, Vec<U256>)> {
        if !self.state.is_initialized() {
            return Err(PoolError::NotInitialized);
        }
        self.state.oracle.observe(
            self.clock.now(),
            seconds_agos,
            self.state.tick,
            self.state.liquidity,
        )
    }

    /// Tick cumulative, seconds per liquidity and seconds spent inside a range
    ///
    /// Only differences between two snapshots of the same range are
    /// meaningful. Both bound ticks must be initialized.
    pub fn snapshot_cumulatives_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(i64, U256, u32)> {
        if !self.state.is_initialized() {
            return Err(PoolError::NotInitialized);
        }
        self.check_ticks(tick_lower, tick_upper)?;

        let lower = self.state.ticks.get(&tick_lower).copied().unwrap_or_default();
        let upper = self.state.ticks.get(&tick_upper).copied().unwrap_or_default();
        if !lower.initialized || !upper.initialized {
            return Err(PoolError::TickNotInitialized);
        }

        let tick = self.state.tick;
        if tick < tick_lower {
            Ok((
                lower.tick_cumulative_outside.wrapping_sub(upper.tick_cumulative_outside),
                wrapping_sub(
                    lower.seconds_per_liquidity_outside_x128,
                    upper.seconds_per_liquidity_outside_x128,
                ) & MASK_160,
                lower.seconds_outside.wrapping_sub(upper.seconds_outside),
            ))
        } else if tick < tick_upper {
            let time = self.clock.now();
            let (tick_cumulative, seconds_per_liquidity_cumulative_x128) = self
                .state
                .oracle
                .observe_single(time, 0, tick, self.state.liquidity)?;
            Ok((
                tick_cumulative
                    .wrapping_sub(lower.tick_cumulative_outside)
                    .wrapping_sub(upper.tick_cumulative_outside),
                wrapping_sub(
                    wrapping_sub(
                        seconds_per_liquidity_cumulative_x128,
                        lower.seconds_per_liquidity_outside_x128,
                    ),
                    upper.seconds_per_liquidity_outside_x128,
                ) & MASK_160,
                time.wrapping_sub(lower.seconds_outside)
                    .wrapping_sub(upper.seconds_outside),
            ))
        } else {
            Ok((
                upper.tick_cumulative_outside.wrapping_sub(lower.tick_cumulative_outside),
                wrapping_sub(
                    upper.seconds_per_liquidity_outside_x128,
                    lower.seconds_per_liquidity_outside_x128,
                ) & MASK_160,
                upper.seconds_outside.wrapping_sub(lower.seconds_outside),
            ))
        }
    }
}
