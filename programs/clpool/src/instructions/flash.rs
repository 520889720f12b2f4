use crate::callbacks::PoolCallee;
use crate::constants::{FEE_RATE_DENOMINATOR, Q128};
use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use crate::math::u256::{to_u128, wrapping_add, U256};
use crate::state::pool::Pool;
use crate::types::Address;

impl<L: TokenLedger + Clone> Pool<L> {
    /// Lend tokens to `recipient` for the duration of `callee.flash_callback`
    ///
    /// The callee must return the amounts plus the pool fee on each. Any
    /// excess paid is credited to in-range liquidity like a fee.
    pub fn flash(
        &mut self,
        callee: &mut dyn PoolCallee<L>,
        recipient: Address,
        amount0: u128,
        amount1: u128,
        data: &[u8],
    ) -> Result<()> {
        self.with_lock("flash", |pool| {
            let liquidity = pool.state.liquidity;
            if liquidity == 0 {
                return Err(PoolError::NoActiveLiquidity);
            }

            let fee = U256::from(pool.config.fee);
            let denominator = U256::from(FEE_RATE_DENOMINATOR);
            let fee0 = to_u128(mul_div_rounding_up(U256::from(amount0), fee, denominator)?)?;
            let fee1 = to_u128(mul_div_rounding_up(U256::from(amount1), fee, denominator)?)?;

            let balances_before = pool.balances();
            let (balance0_before, balance1_before) = balances_before;

            let (token0, token1, address) = (pool.token0(), pool.token1(), pool.address());
            if amount0 > 0 {
                pool.ledger.transfer(token0, address, recipient, amount0)?;
            }
            if amount1 > 0 {
                pool.ledger.transfer(token1, address, recipient, amount1)?;
            }

            callee.flash_callback(pool, fee0, fee1, data)?;

            pool.check_settlement(balances_before, fee0, fee1)?;
            let (balance0_after, balance1_after) = pool.balances();

            // Both are at least the fee by the check above
            let paid0 = balance0_after - balance0_before;
            let paid1 = balance1_after - balance1_before;

            let fee_protocol = pool.state.fee_protocol;
            if paid0 > 0 {
                let fee_protocol0 = fee_protocol % 16;
                let protocol_fees0 = if fee_protocol0 == 0 { 0 } else { paid0 / fee_protocol0 as u128 };
                if protocol_fees0 > 0 {
                    pool.state.protocol_fees.token0 = pool
                        .state
                        .protocol_fees
                        .token0
                        .checked_add(protocol_fees0)
                        .ok_or(PoolError::MathOverflow)?;
                }
                let growth = mul_div(U256::from(paid0 - protocol_fees0), Q128, U256::from(liquidity))?;
                pool.state.fee_growth_global0_x128 =
                    wrapping_add(pool.state.fee_growth_global0_x128, growth);
            }
            if paid1 > 0 {
                let fee_protocol1 = fee_protocol >> 4;
                let protocol_fees1 = if fee_protocol1 == 0 { 0 } else { paid1 / fee_protocol1 as u128 };
                if protocol_fees1 > 0 {
                    pool.state.protocol_fees.token1 = pool
                        .state
                        .protocol_fees
                        .token1
                        .checked_add(protocol_fees1)
                        .ok_or(PoolError::MathOverflow)?;
                }
                let growth = mul_div(U256::from(paid1 - protocol_fees1), Q128, U256::from(liquidity))?;
                pool.state.fee_growth_global1_x128 =
                    wrapping_add(pool.state.fee_growth_global1_x128, growth);
            }

            pool.emit(PoolEvent::Flash {
                sender: callee.address(),
                recipient,
                amount0,
                amount1,
                paid0,
                paid1,
            });
            Ok(())
        })
    }
}
