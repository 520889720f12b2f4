use serde::{Deserialize, Serialize};

use crate::constants::fee_tiers::*;
use crate::constants::{FEE_RATE_DENOMINATOR, MAX_TICK_SPACING};
use crate::errors::{PoolError, Result};
use crate::math::tick_math::{get_max_usable_tick, get_min_usable_tick};
use crate::types::Address;

/// Standard fee tiers and their tick spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeAmount {
    Lowest,
    Low,
    Medium,
    High,
}

impl FeeAmount {
    /// Fee in hundredths of a bip
    pub fn fee(&self) -> u32 {
        match self {
            FeeAmount::Lowest => FEE_TIER_100,
            FeeAmount::Low => FEE_TIER_500,
            FeeAmount::Medium => FEE_TIER_3000,
            FeeAmount::High => FEE_TIER_10000,
        }
    }

    pub fn tick_spacing(&self) -> i32 {
        match self {
            FeeAmount::Lowest => TICK_SPACING_100,
            FeeAmount::Low => TICK_SPACING_500,
            FeeAmount::Medium => TICK_SPACING_3000,
            FeeAmount::High => TICK_SPACING_10000,
        }
    }
}

/// Immutable pool parameters
///
/// Tokens are ordered: `token0 < token1` bytewise. Fee is in hundredths
/// of a bip (3000 = 0.3%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
}

impl PoolConfig {
    /// Build a config for one of the standard tiers
    pub fn from_tier(token0: Address, token1: Address, tier: FeeAmount) -> Self {
        Self {
            token0,
            token1,
            fee: tier.fee(),
            tick_spacing: tier.tick_spacing(),
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PoolConfig =
            serde_json::from_str(json).map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token0 == self.token1 {
            return Err(PoolError::InvalidConfig("identical tokens".into()));
        }
        if self.token0 > self.token1 {
            return Err(PoolError::InvalidConfig("token0 must sort below token1".into()));
        }
        if self.fee >= FEE_RATE_DENOMINATOR {
            return Err(PoolError::InvalidConfig(format!("fee {} too large", self.fee)));
        }
        if self.tick_spacing <= 0 || self.tick_spacing >= MAX_TICK_SPACING {
            return Err(PoolError::InvalidConfig(format!(
                "tick spacing {} out of range",
                self.tick_spacing
            )));
        }
        Ok(())
    }

    /// Per-tick cap on gross liquidity so the sum over every usable tick fits in u128
    pub fn max_liquidity_per_tick(&self) -> u128 {
        tick_spacing_to_max_liquidity_per_tick(self.tick_spacing)
    }
}

/// u128::MAX divided by the number of usable ticks at the given spacing
pub fn tick_spacing_to_max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = get_min_usable_tick(tick_spacing);
    let max_tick = get_max_usable_tick(tick_spacing);
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}
