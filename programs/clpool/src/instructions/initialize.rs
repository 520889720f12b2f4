use tracing::debug;

use crate::constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};
use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::math::tick_math::get_tick_at_sqrt_ratio;
use crate::math::u256::U256;
use crate::state::pool::Pool;

impl<L: TokenLedger + Clone> Pool<L> {
    /// Set the starting price and open the pool
    ///
    /// # Arguments
    /// * `sqrt_price_x96` - Initial sqrt price as Q64.96
    ///
    /// # Errors
    /// * `AlreadyInitialized` if a price was set before
    /// * `InvalidPrice` if the price is outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`
    pub fn initialize(&mut self, sqrt_price_x96: U256) -> Result<()> {
        if self.state.is_initialized() {
            return Err(PoolError::AlreadyInitialized);
        }
        if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(PoolError::InvalidPrice);
        }

        let tick = get_tick_at_sqrt_ratio(sqrt_price_x96)?;
        let time = self.clock.now();

        self.state.oracle.initialize(time);
        self.state.sqrt_price_x96 = sqrt_price_x96;
        self.state.tick = tick;
        self.state.fee_protocol = 0;
        self.state.unlocked = true;

        debug!(pool = %self.address, time, "oracle seeded");
        self.emit(PoolEvent::Initialize {
            sqrt_price_x96,
            tick,
        });
        Ok(())
    }
}
