use crate::errors::Result;
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;
use crate::types::Address;

impl<L: TokenLedger + Clone> Pool<L> {
    /// Send up to the requested amounts of accrued protocol fees to `recipient`
    pub fn collect_protocol(
        &mut self,
        recipient: Address,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128)> {
        self.with_lock("collect_protocol", |pool| {
            let amount0 = amount0_requested.min(pool.state.protocol_fees.token0);
            let amount1 = amount1_requested.min(pool.state.protocol_fees.token1);

            let (token0, token1, address) = (pool.token0(), pool.token1(), pool.address());
            if amount0 > 0 {
                pool.state.protocol_fees.token0 -= amount0;
                pool.ledger.transfer(token0, address, recipient, amount0)?;
            }
            if amount1 > 0 {
                pool.state.protocol_fees.token1 -= amount1;
                pool.ledger.transfer(token1, address, recipient, amount1)?;
            }

            pool.emit(PoolEvent::CollectProtocol {
                recipient,
                amount0,
                amount1,
            });
            Ok((amount0, amount1))
        })
    }
}
