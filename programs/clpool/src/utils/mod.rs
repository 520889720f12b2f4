//! Price conversion helpers

use crate::errors::{PoolError, Result};
use crate::math::u256::{U256, U512};

/// Exact sqrt price for a reserve ratio: sqrt(reserve1 / reserve0) as Q64.96
///
/// Rounds down.
pub fn encode_price_sqrt(reserve1: u128, reserve0: u128) -> Result<U256> {
    if reserve0 == 0 {
        return Err(PoolError::DivisionByZero);
    }
    let ratio_x192 = (U512::from(reserve1) << 192) / U512::from(reserve0);
    U256::try_from(ratio_x192.integer_sqrt())
}

/// Scale a whole-token amount to 18 decimals
pub fn expand_to_18_decimals(amount: u128) -> Result<u128> {
    amount
        .checked_mul(1_000_000_000_000_000_000)
        .ok_or(PoolError::MathOverflow)
}

/// Calculate the price from sqrt price
/// price = sqrt_price^2 / 2^192
pub fn sqrt_price_to_price(sqrt_price_x96: U256) -> f64 {
    let sqrt_price = u256_to_f64(sqrt_price_x96) / 2f64.powi(96);
    sqrt_price * sqrt_price
}

/// Calculate sqrt price from price, approximately
/// sqrt_price = sqrt(price) * 2^96
pub fn price_to_sqrt_price(price: f64) -> Result<U256> {
    if !price.is_finite() || price < 0.0 {
        return Err(PoolError::InvalidPrice);
    }
    let scaled = price.sqrt() * 2f64.powi(96);
    // Highest and lowest sqrt prices need about 160 bits
    let shift = 64;
    let high = (scaled / 2f64.powi(shift)) as u128;
    let low = (scaled - high as f64 * 2f64.powi(shift)).max(0.0) as u128;
    Ok((U256::from(high) << shift) + U256::from(low))
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, word| acc * 2f64.powi(64) + *word as f64)
}
