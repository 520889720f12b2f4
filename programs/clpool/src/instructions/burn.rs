use tracing::debug;

use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;
use crate::types::{Address, PositionKey};

impl<L: TokenLedger + Clone> Pool<L> {
    /// Remove liquidity from `owner`'s position
    ///
    /// Nothing is transferred: the released tokens are added to the
    /// position's owed balances for `collect`. Burning zero settles the
    /// accrued fees only.
    ///
    /// # Returns
    /// Token amounts released in `(amount0, amount1)`
    pub fn burn(
        &mut self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(u128, u128)> {
        self.with_lock("burn", |pool| {
            pool.check_ticks(tick_lower, tick_upper)?;

            let key = PositionKey::new(owner, tick_lower, tick_upper);
            if pool.positions(&key).liquidity < amount {
                return Err(PoolError::InsufficientLiquidity);
            }
            let liquidity_delta = i128::try_from(amount)
                .map(|amount| -amount)
                .map_err(|_| PoolError::LiquidityOverflow)?;

            let (_, amount0_int, amount1_int) =
                pool.modify_position(owner, tick_lower, tick_upper, liquidity_delta)?;
            let amount0 = amount0_int.unsigned_abs();
            let amount1 = amount1_int.unsigned_abs();

            if amount0 > 0 || amount1 > 0 {
                if let Some(position) = pool.state.positions.get_mut(&key) {
                    position.tokens_owed0 = position.tokens_owed0.wrapping_add(amount0);
                    position.tokens_owed1 = position.tokens_owed1.wrapping_add(amount1);
                }
            }

            debug!(%owner, tick_lower, tick_upper, amount, amount0, amount1, "liquidity removed");
            pool.emit(PoolEvent::Burn {
                owner,
                tick_lower,
                tick_upper,
                amount,
                amount0,
                amount1,
            });
            Ok((amount0, amount1))
        })
    }
}
