//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given token deltas,
//! and the token deltas between two sqrt prices.
//!
//! Every result rounds in the pool's favour: prices move so that the
//! pool receives at least, and pays at most, the exact amount.

use crate::constants::{MASK_160, Q96, RESOLUTION};
use crate::errors::{PoolError, Result};
use crate::math::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::math::u256::{to_i128, U256};

/// Get the next sqrt price after adding or removing an amount of token0
///
/// Adding token0 (selling it) moves the price down:
///   next = L * sqrt_price / (L + amount * sqrt_price)
///
/// Removing token0 (buying it) moves the price up:
///   next = L * sqrt_price / (L - amount * sqrt_price)
///
/// Always rounds up, so the price never moves too far down on input
/// or too little up on output.
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator1 = U256::from(liquidity) << RESOLUTION;

    let (product, product_overflowed) = amount.overflowing_mul(sqrt_price_x96);

    if add {
        if !product_overflowed {
            let (denominator, overflowed) = numerator1.overflowing_add(product);
            if !overflowed {
                return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
            }
        }
        // numerator1 / (numerator1 / sqrt_price + amount), rounded up
        let denominator = (numerator1 / sqrt_price_x96)
            .checked_add(amount)
            .ok_or(PoolError::MathOverflow)?;
        div_rounding_up(numerator1, denominator)
    } else {
        // removing token0 beyond the virtual reserves has no price
        if product_overflowed || numerator1 <= product {
            return Err(PoolError::InsufficientLiquidity);
        }
        let denominator = numerator1 - product;
        narrow_to_price(mul_div_rounding_up(numerator1, sqrt_price_x96, denominator)?)
    }
}

/// Get the next sqrt price after adding or removing an amount of token1
///
/// Adding token1 (selling it) moves the price up:
///   next = sqrt_price + amount / L
///
/// Removing token1 (buying it) moves the price down:
///   next = sqrt_price - amount / L
///
/// Always rounds down.
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256> {
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = if amount <= MASK_160 {
            (amount << RESOLUTION) / liquidity
        } else {
            mul_div(amount, Q96, liquidity)?
        };
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or(PoolError::MathOverflow)?;
        narrow_to_price(next)
    } else {
        let quotient = if amount <= MASK_160 {
            div_rounding_up(amount << RESOLUTION, liquidity)?
        } else {
            mul_div_rounding_up(amount, Q96, liquidity)?
        };
        if sqrt_price_x96 <= quotient {
            return Err(PoolError::InsufficientLiquidity);
        }
        Ok(sqrt_price_x96 - quotient)
    }
}

/// Get the next sqrt price from an input amount
///
/// # Arguments
/// * `sqrt_price_x96` - Starting price, nonzero
/// * `liquidity` - Usable liquidity, nonzero
/// * `amount_in` - Amount of token0 (zero_for_one) or token1 being swapped in
/// * `zero_for_one` - Direction of the swap
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256> {
    check_price_and_liquidity(sqrt_price_x96, liquidity)?;

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Get the next sqrt price from an output amount
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256> {
    check_price_and_liquidity(sqrt_price_x96, liquidity)?;

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Amount of token0 between two prices
///
/// amount0 = L * 2^96 * (sqrt_b - sqrt_a) / (sqrt_b * sqrt_a)
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_ratio_lower.is_zero() {
        return Err(PoolError::PriceOutOfBounds);
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = sqrt_ratio_upper - sqrt_ratio_lower;

    if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_upper)?,
            sqrt_ratio_lower,
        )
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_ratio_upper)? / sqrt_ratio_lower)
    }
}

/// Amount of token1 between two prices
///
/// amount1 = L * (sqrt_b - sqrt_a) / 2^96
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let diff = sqrt_ratio_upper - sqrt_ratio_lower;

    if round_up {
        mul_div_rounding_up(U256::from(liquidity), diff, Q96)
    } else {
        mul_div(U256::from(liquidity), diff, Q96)
    }
}

/// Signed token0 delta for a liquidity change
///
/// Adding liquidity rounds the owed amount up, removing rounds the
/// returned amount down (and negates it).
pub fn get_amount0_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<i128> {
    if liquidity < 0 {
        let amount = get_amount0_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, liquidity.unsigned_abs(), false)?;
        Ok(-to_i128(amount)?)
    } else {
        let amount = get_amount0_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, liquidity as u128, true)?;
        to_i128(amount)
    }
}

/// Signed token1 delta for a liquidity change
pub fn get_amount1_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<i128> {
    if liquidity < 0 {
        let amount = get_amount1_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, liquidity.unsigned_abs(), false)?;
        Ok(-to_i128(amount)?)
    } else {
        let amount = get_amount1_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, liquidity as u128, true)?;
        to_i128(amount)
    }
}

fn sort(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn check_price_and_liquidity(sqrt_price_x96: U256, liquidity: u128) -> Result<()> {
    if sqrt_price_x96.is_zero() {
        return Err(PoolError::PriceOutOfBounds);
    }
    if liquidity == 0 {
        return Err(PoolError::ZeroLiquidity);
    }
    Ok(())
}

/// Prices are 160-bit values
fn narrow_to_price(value: U256) -> Result<U256> {
    if value > MASK_160 {
        return Err(PoolError::MathOverflow);
    }
    Ok(value)
}
