use crate::constants::protocol_fee::{MAX_DENOMINATOR, MIN_DENOMINATOR};
use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;

fn is_valid_denominator(fee_protocol: u8) -> bool {
    fee_protocol == 0 || (MIN_DENOMINATOR..=MAX_DENOMINATOR).contains(&fee_protocol)
}

impl<L: TokenLedger + Clone> Pool<L> {
    /// Set the protocol's share of swap fees, as 1/N per token
    ///
    /// Each denominator is 0 (off) or between 4 and 10.
    pub fn set_fee_protocol(&mut self, fee_protocol0: u8, fee_protocol1: u8) -> Result<()> {
        self.with_lock("set_fee_protocol", |pool| {
            if !is_valid_denominator(fee_protocol0) || !is_valid_denominator(fee_protocol1) {
                return Err(PoolError::InvalidFeeProtocolSplit);
            }
            let fee_protocol_old = pool.state.fee_protocol;
            pool.state.fee_protocol = fee_protocol0 + (fee_protocol1 << 4);
            pool.emit(PoolEvent::SetFeeProtocol {
                fee_protocol0_old: fee_protocol_old % 16,
                fee_protocol1_old: fee_protocol_old >> 4,
                fee_protocol0_new: fee_protocol0,
                fee_protocol1_new: fee_protocol1,
            });
            Ok(())
        })
    }
}
