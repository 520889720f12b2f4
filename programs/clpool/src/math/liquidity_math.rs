//! Liquidity Math
//!
//! Functions for applying liquidity deltas and converting between
//! liquidity and token amounts.

use crate::constants::Q96;
use crate::errors::{PoolError, Result};
use crate::math::full_math::mul_div;
use crate::math::sqrt_price_math::{get_amount0_delta, get_amount1_delta};
use crate::math::u256::{to_u128, U256};

/// Add a signed liquidity delta to existing liquidity
///
/// # Errors
/// `LiquidityOverflow` if the result leaves the u128 range in either direction
pub fn add_delta(x: u128, y: i128) -> Result<u128> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(PoolError::LiquidityOverflow)
    } else {
        x.checked_add(y as u128)
            .ok_or(PoolError::LiquidityOverflow)
    }
}

/// Liquidity received for a given amount of token0 over a price range
///
/// L = amount0 * (sqrt_a * sqrt_b / 2^96) / (sqrt_b - sqrt_a)
pub fn get_liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: u128,
) -> Result<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_ratio_lower == sqrt_ratio_upper {
        return Err(PoolError::DivisionByZero);
    }
    let intermediate = mul_div(sqrt_ratio_lower, sqrt_ratio_upper, Q96)?;
    to_u128(mul_div(
        U256::from(amount0),
        intermediate,
        sqrt_ratio_upper - sqrt_ratio_lower,
    )?)
}

/// Liquidity received for a given amount of token1 over a price range
///
/// L = amount1 * 2^96 / (sqrt_b - sqrt_a)
pub fn get_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: u128,
) -> Result<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_ratio_lower == sqrt_ratio_upper {
        return Err(PoolError::DivisionByZero);
    }
    to_u128(mul_div(U256::from(amount1), Q96, sqrt_ratio_upper - sqrt_ratio_lower)?)
}

/// Calculate the maximum liquidity that can be added with the given amounts
/// for a position in the range [sqrt_ratio_a, sqrt_ratio_b] at the current price
pub fn get_liquidity_for_amounts(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: u128,
    amount1: u128,
) -> Result<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        // Below range, only token0 is needed
        get_liquidity_for_amount0(sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let liquidity0 = get_liquidity_for_amount0(sqrt_ratio_x96, sqrt_ratio_upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(sqrt_ratio_lower, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        // Above range, only token1 is needed
        get_liquidity_for_amount1(sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// Token amounts represented by a liquidity amount at the current price
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<(U256, U256)> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        let amount0 = get_amount0_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Ok((amount0, U256::zero()))
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let amount0 = get_amount0_delta(sqrt_ratio_x96, sqrt_ratio_upper, liquidity, round_up)?;
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_x96, liquidity, round_up)?;
        Ok((amount0, amount1))
    } else {
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Ok((U256::zero(), amount1))
    }
}

fn sort(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
