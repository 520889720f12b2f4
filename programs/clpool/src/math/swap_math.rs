//! Swap Math
//!
//! Core swap computation logic for a single step between the current
//! price and a target price at constant liquidity.

use crate::constants::FEE_RATE_DENOMINATOR;
use crate::errors::{PoolError, Result};
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{
    get_amount0_delta, get_amount1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use crate::math::u256::U256;

/// Result of a single swap step computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStepResult {
    /// The new sqrt price after the swap step
    pub sqrt_price_next_x96: U256,
    /// Amount of input token consumed, excluding the fee
    pub amount_in: U256,
    /// Amount of output token produced
    pub amount_out: U256,
    /// Fee charged on the input leg
    pub fee_amount: U256,
}

/// Compute the result of a single swap step
///
/// # Arguments
/// * `sqrt_price_current_x96` - Current sqrt price (Q64.96)
/// * `sqrt_price_target_x96` - Price that cannot be exceeded (next tick or limit)
/// * `liquidity` - Usable liquidity
/// * `amount_remaining` - Positive for exact input, negative for exact output
/// * `fee_pips` - Fee in hundredths of a bip (3000 = 0.3%)
///
/// The direction is implied by the target: zero_for_one when the target is
/// at or below the current price. The step stops on the target only when
/// the remaining amount reaches at least that far.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: i128,
    fee_pips: u32,
) -> Result<SwapStepResult> {
    if fee_pips >= FEE_RATE_DENOMINATOR {
        return Err(PoolError::InvalidConfig(format!("fee {fee_pips} is not below 100%")));
    }
    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let exact_in = amount_remaining >= 0;
    let amount_remaining_abs = U256::from(amount_remaining.unsigned_abs());

    let fee = U256::from(fee_pips);
    let fee_complement = U256::from(FEE_RATE_DENOMINATOR - fee_pips);

    // Amount needed to reach the target on the specified leg
    let amount_to_target = if exact_in {
        if zero_for_one {
            get_amount0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)?
        } else {
            get_amount1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)?
        }
    } else if zero_for_one {
        get_amount1_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, false)?
    } else {
        get_amount0_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, false)?
    };

    let sqrt_price_next_x96 = if exact_in {
        let amount_remaining_less_fee = mul_div(
            amount_remaining_abs,
            fee_complement,
            U256::from(FEE_RATE_DENOMINATOR),
        )?;
        if amount_remaining_less_fee >= amount_to_target {
            sqrt_price_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_price_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?
        }
    } else if amount_remaining_abs >= amount_to_target {
        sqrt_price_target_x96
    } else {
        get_next_sqrt_price_from_output(
            sqrt_price_current_x96,
            liquidity,
            amount_remaining_abs,
            zero_for_one,
        )?
    };

    let reached_target = sqrt_price_next_x96 == sqrt_price_target_x96;

    // Reuse the boundary amount when the step ended on the target
    let (amount_in, mut amount_out) = if zero_for_one {
        let amount_in = if reached_target && exact_in {
            amount_to_target
        } else {
            get_amount0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, true)?
        };
        let amount_out = if reached_target && !exact_in {
            amount_to_target
        } else {
            get_amount1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)?
        };
        (amount_in, amount_out)
    } else {
        let amount_in = if reached_target && exact_in {
            amount_to_target
        } else {
            get_amount1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, true)?
        };
        let amount_out = if reached_target && !exact_in {
            amount_to_target
        } else {
            get_amount0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)?
        };
        (amount_in, amount_out)
    };

    // Never pay out more than the exact output asked for
    if !exact_in && amount_out > amount_remaining_abs {
        amount_out = amount_remaining_abs;
    }

    let fee_amount = if exact_in && !reached_target {
        // the remainder of the input was not enough to move the price, keep it as fee
        amount_remaining_abs
            .checked_sub(amount_in)
            .ok_or(PoolError::MathOverflow)?
    } else {
        mul_div_rounding_up(amount_in, fee, fee_complement)?
    };

    Ok(SwapStepResult {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}
