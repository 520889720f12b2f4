//! Callee interface
//!
//! Mint, swap and flash hand control to the caller after the pool has
//! committed its state. The callee settles by transferring tokens into
//! `pool.address()` through `pool.ledger_mut()`; the pool then checks that
//! each of its balances grew by at least what was owed on that token, and
//! did not shrink on a token nothing was owed on. Any pool operation
//! attempted from inside a callback fails with `Locked`.

use crate::errors::{PoolError, Result};
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;
use crate::types::Address;

pub trait PoolCallee<L: TokenLedger + Clone> {
    /// Account the callee acts as; the sender of the resulting events
    fn address(&self) -> Address;

    /// Pay for minted liquidity
    fn mint_callback(
        &mut self,
        _pool: &mut Pool<L>,
        _amount0_owed: u128,
        _amount1_owed: u128,
        _data: &[u8],
    ) -> Result<()> {
        Err(PoolError::Callback("mint callback not supported".into()))
    }

    /// Pay the input side of a swap
    ///
    /// Positive deltas are owed to the pool, negative deltas were already
    /// sent to the recipient.
    fn swap_callback(
        &mut self,
        _pool: &mut Pool<L>,
        _amount0_delta: i128,
        _amount1_delta: i128,
        _data: &[u8],
    ) -> Result<()> {
        Err(PoolError::Callback("swap callback not supported".into()))
    }

    /// Repay a flash loan plus fees
    fn flash_callback(
        &mut self,
        _pool: &mut Pool<L>,
        _fee0: u128,
        _fee1: u128,
        _data: &[u8],
    ) -> Result<()> {
        Err(PoolError::Callback("flash callback not supported".into()))
    }
}
