//! Full precision math operations
//!
//! `a * b / denominator` over 256-bit operands with a 512-bit
//! intermediate, so the product never truncates.

use crate::errors::{PoolError, Result};
use crate::math::u256::{U256, U512};

/// Multiply two 256-bit numbers and divide by a third, with full precision
///
/// # Formula
/// result = floor(a * b / denominator)
///
/// # Errors
/// * `DivisionByZero` if denominator is zero
/// * `MathOverflow` if the quotient does not fit in 256 bits
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(PoolError::DivisionByZero);
    }
    let product = U512::from(a) * U512::from(b);
    U256::try_from(product / U512::from(denominator))
}

/// Multiply two 256-bit numbers and divide by a third, rounding up
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(PoolError::DivisionByZero);
    }
    let product = U512::from(a) * U512::from(b);
    let denominator = U512::from(denominator);
    let result = U256::try_from(product / denominator)?;

    if (product % denominator).is_zero() {
        Ok(result)
    } else {
        result.checked_add(U256::one()).ok_or(PoolError::MathOverflow)
    }
}

/// ceil(x / y)
pub fn div_rounding_up(x: U256, y: U256) -> Result<U256> {
    if y.is_zero() {
        return Err(PoolError::DivisionByZero);
    }
    let quotient = x / y;
    if (x % y).is_zero() {
        Ok(quotient)
    } else {
        // x / y < 2^256 - 1 whenever the remainder is nonzero
        Ok(quotient + U256::one())
    }
}
