use tracing::debug;

use crate::callbacks::PoolCallee;
use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;
use crate::types::Address;

impl<L: TokenLedger + Clone> Pool<L> {
    /// Add liquidity to a position
    ///
    /// The pool credits the position first, then asks `callee` to pay the
    /// owed amounts and verifies its balances grew by at least that much.
    ///
    /// # Arguments
    /// * `callee` - Pays through `mint_callback`
    /// * `recipient` - Owner of the position
    /// * `tick_lower` / `tick_upper` - Position range
    /// * `amount` - Liquidity to add
    /// * `data` - Passed through to the callback
    ///
    /// # Returns
    /// Token amounts paid in `(amount0, amount1)`
    pub fn mint(
        &mut self,
        callee: &mut dyn PoolCallee<L>,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        data: &[u8],
    ) -> Result<(u128, u128)> {
        self.with_lock("mint", |pool| {
            if amount == 0 {
                return Err(PoolError::ZeroLiquidity);
            }
            let liquidity_delta =
                i128::try_from(amount).map_err(|_| PoolError::LiquidityOverflow)?;

            let (_, amount0_int, amount1_int) =
                pool.modify_position(recipient, tick_lower, tick_upper, liquidity_delta)?;
            let amount0 = u128::try_from(amount0_int).map_err(|_| PoolError::MathOverflow)?;
            let amount1 = u128::try_from(amount1_int).map_err(|_| PoolError::MathOverflow)?;

            let balances_before = pool.balances();
            callee.mint_callback(pool, amount0, amount1, data)?;
            pool.check_settlement(balances_before, amount0, amount1)?;

            debug!(%recipient, tick_lower, tick_upper, amount, amount0, amount1, "liquidity added");
            pool.emit(PoolEvent::Mint {
                sender: callee.address(),
                owner: recipient,
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
