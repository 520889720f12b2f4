use crate::errors::Result;
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;
use crate::types::{Address, PositionKey};

impl<L: TokenLedger + Clone> Pool<L> {
    /// Withdraw up to the requested amounts of what `owner`'s position is owed
    ///
    /// A position that still holds liquidity has its fees settled first,
    /// so collected amounts include fees accrued since the last touch.
    ///
    /// # Returns
    /// Amounts sent to `recipient` in `(amount0, amount1)`
    pub fn collect(
        &mut self,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128)> {
        self.with_lock("collect", |pool| {
            let key = PositionKey::new(owner, tick_lower, tick_upper);
            if pool.positions(&key).liquidity > 0 {
                pool.update_position(owner, tick_lower, tick_upper, 0)?;
            }

            let mut position = pool.positions(&key);
            let amount0 = amount0_requested.min(position.tokens_owed0);
            let amount1 = amount1_requested.min(position.tokens_owed1);

            if amount0 > 0 || amount1 > 0 {
                position.tokens_owed0 -= amount0;
                position.tokens_owed1 -= amount1;
                pool.state.positions.insert(key, position);

                let (token0, token1, address) = (pool.token0(), pool.token1(), pool.address());
                if amount0 > 0 {
                    pool.ledger.transfer(token0, address, recipient, amount0)?;
                }
                if amount1 > 0 {
                    pool.ledger.transfer(token1, address, recipient, amount1)?;
                }
            }

            pool.emit(PoolEvent::Collect {
                owner,
                recipient,
                tick_lower,
                tick_upper,
                amount0,
                amount1,
            });
            Ok((amount0, amount1))
        })
    }
}
