//! Token Ledger
//!
//! Balances the pool settles against. The pool only ever pays out through
//! `transfer` and verifies incoming payments by reading balances.

use std::collections::HashMap;

use tracing::trace;

use crate::errors::{PoolError, Result};
use crate::types::Address;

pub trait TokenLedger {
    fn balance_of(&self, token: Address, account: Address) -> u128;

    /// Move `amount` of `token` between accounts
    ///
    /// # Errors
    /// `InsufficientBalance` if `from` holds less than `amount`
    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: u128) -> Result<()>;
}

/// HashMap-backed ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: HashMap<(Address, Address), u128>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit new tokens to an account
    pub fn mint_to(&mut self, token: Address, account: Address, amount: u128) -> Result<()> {
        let balance = self.balances.entry((token, account)).or_default();
        *balance = balance.checked_add(amount).ok_or(PoolError::MathOverflow)?;
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, token: Address, account: Address) -> u128 {
        self.balances.get(&(token, account)).copied().unwrap_or_default()
    }

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: u128) -> Result<()> {
        if amount == 0 || from == to {
            return Ok(());
        }
        let from_balance = self.balance_of(token, from);
        let from_after = from_balance
            .checked_sub(amount)
            .ok_or(PoolError::InsufficientBalance)?;
        let to_after = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(PoolError::MathOverflow)?;

        self.balances.insert((token, from), from_after);
        self.balances.insert((token, to), to_after);
        trace!(%token, %from, %to, amount, "transfer");
        Ok(())
    }
}
