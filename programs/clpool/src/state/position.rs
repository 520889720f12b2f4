use std::collections::HashMap;

use crate::constants::Q128;
use crate::errors::{PoolError, Result};
use crate::math::full_math::mul_div;
use crate::math::liquidity_math::add_delta;
use crate::math::u256::{wrapping_sub, U256};
use crate::types::PositionKey;

/// Positions keyed by (owner, lower, upper)
pub type PositionMap = HashMap<PositionKey, Position>;

/// Liquidity position - an owner's concentrated liquidity in one range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Amount of liquidity in this position
    pub liquidity: u128,

    /// Fee growth inside the position's range at last update (token0)
    pub fee_growth_inside0_last_x128: U256,

    /// Fee growth inside the position's range at last update (token1)
    pub fee_growth_inside1_last_x128: U256,

    /// Tokens owed to the position owner (token0), fees plus burned principal
    pub tokens_owed0: u128,

    /// Tokens owed to the position owner (token1)
    pub tokens_owed1: u128,
}

impl Position {
    /// Check if position is empty (no liquidity and no owed tokens)
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed0 == 0 && self.tokens_owed1 == 0
    }

    /// Apply a liquidity delta and credit the fees earned since the last update
    ///
    /// tokens = liquidity * (fee_growth_inside - fee_growth_inside_last) / 2^128
    ///
    /// # Errors
    /// * `EmptyPosition` for a zero delta on a position without liquidity
    /// * `LiquidityOverflow` if the liquidity leaves the u128 range
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside0_x128: U256,
        fee_growth_inside1_x128: U256,
    ) -> Result<()> {
        let liquidity_next = if liquidity_delta == 0 {
            if self.liquidity == 0 {
                return Err(PoolError::EmptyPosition);
            }
            self.liquidity
        } else {
            add_delta(self.liquidity, liquidity_delta)?
        };

        let owed0 = mul_div(
            wrapping_sub(fee_growth_inside0_x128, self.fee_growth_inside0_last_x128),
            U256::from(self.liquidity),
            Q128,
        )?;
        let owed1 = mul_div(
            wrapping_sub(fee_growth_inside1_x128, self.fee_growth_inside1_last_x128),
            U256::from(self.liquidity),
            Q128,
        )?;

        if liquidity_delta != 0 {
            self.liquidity = liquidity_next;
        }
        self.fee_growth_inside0_last_x128 = fee_growth_inside0_x128;
        self.fee_growth_inside1_last_x128 = fee_growth_inside1_x128;

        // Owed amounts truncate to 128 bits and wrap; owners must collect
        // before reaching u128::MAX
        if !owed0.is_zero() || !owed1.is_zero() {
            self.tokens_owed0 = self.tokens_owed0.wrapping_add(owed0.low_u128());
            self.tokens_owed1 = self.tokens_owed1.wrapping_add(owed1.low_u128());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poke_empty_position_fails() {
        let mut position = Position::default();
        assert_eq!(
            position.update(0, Q128, Q128),
            Err(PoolError::EmptyPosition)
        );
        assert_eq!(position, Position::default());
    }

    #[test]
    fn test_update_accrues_fees_on_prior_liquidity() {
        let mut position = Position::default();
        position.update(100, U256::zero(), U256::zero()).unwrap();
        assert_eq!(position.liquidity, 100);

        // 3 units of token0 and 1/2 unit of token1 per unit of liquidity
        let growth0 = Q128 * 3;
        let growth1 = Q128 / 2;
        position.update(50, growth0, growth1).unwrap();
        assert_eq!(position.liquidity, 150);
        assert_eq!(position.tokens_owed0, 300);
        assert_eq!(position.tokens_owed1, 50);
        assert_eq!(position.fee_growth_inside0_last_x128, growth0);

        // no growth since last update
        position.update(-150, growth0, growth1).unwrap();
        assert_eq!(position.liquidity, 0);
        assert_eq!(position.tokens_owed0, 300);
        assert!(!position.is_empty());
    }

    #[test]
    fn test_update_handles_growth_wraparound() {
        let mut position = Position {
            liquidity: 1,
            fee_growth_inside0_last_x128: U256::MAX - Q128 + 1,
            ..Position::default()
        };
        // growth wrapped through zero, delta is exactly one unit
        position.update(0, U256::zero(), U256::zero()).unwrap();
        assert_eq!(position.tokens_owed0, 1);
    }

    #[test]
    fn test_burn_more_than_held_fails() {
        let mut position = Position::default();
        position.update(10, U256::zero(), U256::zero()).unwrap();
        assert_eq!(
            position.update(-11, U256::zero(), U256::zero()),
            Err(PoolError::LiquidityOverflow)
        );
    }
}
