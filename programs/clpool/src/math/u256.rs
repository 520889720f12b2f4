//! Wide Integers
//!
//! 256-bit words for prices and accumulators, 512-bit words for
//! full-precision intermediates in `mul_div`.

use num_traits::ToPrimitive;

use crate::errors::{PoolError, Result};

#[allow(clippy::manual_div_ceil, clippy::assign_op_pattern, clippy::ptr_offset_with_cast)]
mod uint_impl {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer.
        pub struct U256(4);
    }

    construct_uint! {
        /// 512-bit unsigned integer.
        pub struct U512(8);
    }
}

pub use uint_impl::{U256, U512};

impl From<U256> for U512 {
    fn from(value: U256) -> Self {
        let mut words = [0u64; 8];
        words[..4].copy_from_slice(&value.0);
        U512(words)
    }
}

impl TryFrom<U512> for U256 {
    type Error = PoolError;

    fn try_from(value: U512) -> Result<Self> {
        if value.0[4..].iter().any(|w| *w != 0) {
            return Err(PoolError::MathOverflow);
        }
        let mut words = [0u64; 4];
        words.copy_from_slice(&value.0[..4]);
        Ok(U256(words))
    }
}

impl ToPrimitive for U256 {
    fn to_i64(&self) -> Option<i64> {
        self.to_u64().and_then(|v| i64::try_from(v).ok())
    }

    fn to_u64(&self) -> Option<u64> {
        if self.0[1..].iter().any(|w| *w != 0) {
            None
        } else {
            Some(self.0[0])
        }
    }

    fn to_i128(&self) -> Option<i128> {
        self.to_u128().and_then(|v| i128::try_from(v).ok())
    }

    fn to_u128(&self) -> Option<u128> {
        if self.0[2..].iter().any(|w| *w != 0) {
            None
        } else {
            Some(((self.0[1] as u128) << 64) | self.0[0] as u128)
        }
    }
}

/// Narrow to u128, failing with `MathOverflow`
pub fn to_u128(value: U256) -> Result<u128> {
    value.to_u128().ok_or(PoolError::MathOverflow)
}

/// Narrow to i128, failing with `MathOverflow`
pub fn to_i128(value: U256) -> Result<i128> {
    value.to_i128().ok_or(PoolError::MathOverflow)
}

/// Two's complement encoding of a signed value in 256 bits
pub fn from_i128(value: i128) -> U256 {
    if value >= 0 {
        U256::from(value as u128)
    } else {
        // -v = !(|v| - 1); -(v + 1) cannot overflow
        !U256::from((-(value + 1)) as u128)
    }
}

/// Addition mod 2^256
pub fn wrapping_add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

/// Subtraction mod 2^256
pub fn wrapping_sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

/// Arithmetic shift right by 128 of a two's complement word, narrowed to i32
pub fn sar128_to_i32(value: U256) -> i32 {
    if value.bit(255) {
        let magnitude = ((!value) >> 128).low_u64() as i64;
        (-magnitude - 1) as i32
    } else {
        (value >> 128).low_u64() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u512_round_trip_fits() {
        let x = U256::MAX;
        let wide = U512::from(x);
        assert_eq!(U256::try_from(wide).unwrap(), x);
        assert_eq!(U256::try_from(wide + U512::one()), Err(PoolError::MathOverflow));
    }

    #[test]
    fn test_to_u128_bounds() {
        assert_eq!(to_u128(U256::from(u128::MAX)).unwrap(), u128::MAX);
        assert_eq!(to_u128(U256::from(u128::MAX) + 1), Err(PoolError::MathOverflow));
        assert_eq!(to_i128(U256::from(u128::MAX)), Err(PoolError::MathOverflow));
        assert_eq!(to_i128(U256::from(7u8)).unwrap(), 7);
    }

    #[test]
    fn test_twos_complement_shift() {
        assert_eq!(sar128_to_i32(from_i128(5) << 128), 5);
        assert_eq!(sar128_to_i32(from_i128(-5) << 128), -5);
        // floor semantics for negative values
        assert_eq!(sar128_to_i32(from_i128(-1)), -1);
        assert_eq!(sar128_to_i32(from_i128(i128::MIN)), -1);
    }
}
