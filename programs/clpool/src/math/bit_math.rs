//! Bit Math
//!
//! Bit searches over 256-bit tick bitmap words.

use crate::errors::{PoolError, Result};
use crate::math::u256::U256;

/// Find the most significant bit (position of highest set bit)
/// Zero has no set bit and is rejected
pub fn most_significant_bit(x: U256) -> Result<u8> {
    if x.is_zero() {
        return Err(PoolError::MathOverflow);
    }

    let mut n = x;
    let mut r = 0u8;

    for shift in [128u32, 64, 32, 16, 8, 4, 2, 1] {
        if n >= U256::one() << shift {
            n = n >> shift;
            r += shift as u8;
        }
    }

    Ok(r)
}

/// Find the least significant bit (position of lowest set bit)
/// Zero has no set bit and is rejected
pub fn least_significant_bit(x: U256) -> Result<u8> {
    if x.is_zero() {
        return Err(PoolError::MathOverflow);
    }

    let mut n = x;
    let mut r = 255u8;

    for shift in [128u32, 64, 32, 16, 8, 4, 2, 1] {
        let mask = (U256::one() << shift) - 1;
        if !(n & mask).is_zero() {
            r -= shift as u8;
        } else {
            n = n >> shift;
        }
    }

    Ok(r)
}

/// Find position of next set bit at or after position
pub fn next_bit_position(word: U256, position: u8) -> Option<u8> {
    let masked = word & !((U256::one() << position) - 1);
    least_significant_bit(masked).ok()
}

/// Find position of previous set bit at or before position
pub fn prev_bit_position(word: U256, position: u8) -> Option<u8> {
    let mask = if position == 255 {
        U256::MAX
    } else {
        (U256::one() << (position + 1)) - 1
    };
    most_significant_bit(word & mask).ok()
}

/// Toggle a specific bit
#[inline]
pub fn toggle_bit(word: U256, position: u8) -> U256 {
    word ^ (U256::one() << position)
}

/// Check if a specific bit is set
#[inline]
pub fn is_bit_set(word: U256, position: u8) -> bool {
    word.bit(position as usize)
}
