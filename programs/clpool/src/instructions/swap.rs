use tracing::trace;

use crate::callbacks::PoolCallee;
use crate::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, Q128};
use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::math::full_math::mul_div;
use crate::math::liquidity_math::add_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use crate::math::u256::{to_i128, to_u128, wrapping_add, U256};
use crate::state::pool::Pool;
use crate::state::tick::TickGlobals;
use crate::types::Address;

/// Values fixed for the whole swap
struct SwapCache {
    /// Protocol fee denominator for the input token
    fee_protocol: u8,
    liquidity_start: u128,
    block_timestamp: u32,
    /// Oracle accumulators, read on the first initialized tick crossed
    tick_cumulative: i64,
    seconds_per_liquidity_cumulative_x128: U256,
    computed_latest_observation: bool,
}

/// Running state of the swap loop
struct SwapState {
    /// Positive while input remains (exact in), negative while output remains (exact out)
    amount_specified_remaining: i128,
    /// Output produced so far (negative) or input owed so far (positive)
    amount_calculated: i128,
    sqrt_price_x96: U256,
    tick: i32,
    /// Global fee growth of the input token
    fee_growth_global_x128: U256,
    protocol_fee: u128,
    liquidity: u128,
}

impl<L: TokenLedger + Clone> Pool<L> {
    /// Swap token0 for token1, or token1 for token0
    ///
    /// The output is sent to `recipient` before `callee.swap_callback` is
    /// asked to pay the input; the pool then verifies its balance.
    ///
    /// # Arguments
    /// * `zero_for_one` - Direction: token0 in, token1 out when true
    /// * `amount_specified` - Exact input when positive, exact output when negative
    /// * `sqrt_price_limit_x96` - Price the swap may not cross
    ///
    /// # Returns
    /// Pool balance deltas `(amount0, amount1)`, positive for tokens received
    pub fn swap(
        &mut self,
        callee: &mut dyn PoolCallee<L>,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
        data: &[u8],
    ) -> Result<(i128, i128)> {
        if amount_specified == 0 {
            return Err(PoolError::ZeroAmount);
        }

        self.with_lock("swap", |pool| {
            let sqrt_price_start_x96 = pool.state.sqrt_price_x96;
            let tick_start = pool.state.tick;

            // Validate price limit direction
            let limit_valid = if zero_for_one {
                sqrt_price_limit_x96 < sqrt_price_start_x96 && sqrt_price_limit_x96 > MIN_SQRT_RATIO
            } else {
                sqrt_price_limit_x96 > sqrt_price_start_x96 && sqrt_price_limit_x96 < MAX_SQRT_RATIO
            };
            if !limit_valid {
                return Err(PoolError::InvalidPriceLimit);
            }

            let fee_protocol = pool.state.fee_protocol;
            let mut cache = SwapCache {
                fee_protocol: if zero_for_one { fee_protocol % 16 } else { fee_protocol >> 4 },
                liquidity_start: pool.state.liquidity,
                block_timestamp: pool.clock.now(),
                tick_cumulative: 0,
                seconds_per_liquidity_cumulative_x128: U256::zero(),
                computed_latest_observation: false,
            };

            let exact_input = amount_specified > 0;
            let fee = pool.config.fee;
            let tick_spacing = pool.config.tick_spacing;

            let mut state = SwapState {
                amount_specified_remaining: amount_specified,
                amount_calculated: 0,
                sqrt_price_x96: sqrt_price_start_x96,
                tick: tick_start,
                fee_growth_global_x128: if zero_for_one {
                    pool.state.fee_growth_global0_x128
                } else {
                    pool.state.fee_growth_global1_x128
                },
                protocol_fee: 0,
                liquidity: cache.liquidity_start,
            };

            // Main swap loop
            while state.amount_specified_remaining != 0 && state.sqrt_price_x96 != sqrt_price_limit_x96 {
                let sqrt_price_step_start_x96 = state.sqrt_price_x96;

                let (tick_next, initialized) = pool
                    .state
                    .tick_bitmap
                    .next_initialized_tick_within_one_word(state.tick, tick_spacing, zero_for_one);
                // The bitmap knows nothing about the tick bounds
                let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
                let sqrt_price_next_x96 = get_sqrt_ratio_at_tick(tick_next)?;

                // Stop at the limit if it comes before the next tick
                let sqrt_price_target_x96 = if zero_for_one {
                    sqrt_price_next_x96.max(sqrt_price_limit_x96)
                } else {
                    sqrt_price_next_x96.min(sqrt_price_limit_x96)
                };

                let step = compute_swap_step(
                    state.sqrt_price_x96,
                    sqrt_price_target_x96,
                    state.liquidity,
                    state.amount_specified_remaining,
                    fee,
                )?;
                state.sqrt_price_x96 = step.sqrt_price_next_x96;

                let amount_in = to_i128(step.amount_in)?;
                let amount_out = to_i128(step.amount_out)?;
                let fee_paid = to_i128(step.fee_amount)?;

                if exact_input {
                    state.amount_specified_remaining = state
                        .amount_specified_remaining
                        .checked_sub(amount_in)
                        .and_then(|remaining| remaining.checked_sub(fee_paid))
                        .ok_or(PoolError::MathOverflow)?;
                    state.amount_calculated = state
                        .amount_calculated
                        .checked_sub(amount_out)
                        .ok_or(PoolError::MathOverflow)?;
                } else {
                    state.amount_specified_remaining = state
                        .amount_specified_remaining
                        .checked_add(amount_out)
                        .ok_or(PoolError::MathOverflow)?;
                    state.amount_calculated = state
                        .amount_calculated
                        .checked_add(amount_in)
                        .and_then(|calculated| calculated.checked_add(fee_paid))
                        .ok_or(PoolError::MathOverflow)?;
                }

                // Split off the protocol's share of the fee
                let mut fee_amount = step.fee_amount;
                if cache.fee_protocol > 0 {
                    let delta = fee_amount / U256::from(cache.fee_protocol);
                    fee_amount -= delta;
                    state.protocol_fee = state
                        .protocol_fee
                        .checked_add(to_u128(delta)?)
                        .ok_or(PoolError::MathOverflow)?;
                }

                // Update fee growth
                if state.liquidity > 0 {
                    let fee_growth_delta = mul_div(fee_amount, Q128, U256::from(state.liquidity))?;
                    state.fee_growth_global_x128 =
                        wrapping_add(state.fee_growth_global_x128, fee_growth_delta);
                }

                if state.sqrt_price_x96 == sqrt_price_next_x96 {
                    if initialized {
                        // Read the oracle once, with the values from before the swap
                        if !cache.computed_latest_observation {
                            let (tick_cumulative, seconds_per_liquidity_cumulative_x128) =
                                pool.state.oracle.observe_single(
                                    cache.block_timestamp,
                                    0,
                                    tick_start,
                                    cache.liquidity_start,
                                )?;
                            cache.tick_cumulative = tick_cumulative;
                            cache.seconds_per_liquidity_cumulative_x128 =
                                seconds_per_liquidity_cumulative_x128;
                            cache.computed_latest_observation = true;
                        }

                        let globals = TickGlobals {
                            fee_growth_global0_x128: if zero_for_one {
                                state.fee_growth_global_x128
                            } else {
                                pool.state.fee_growth_global0_x128
                            },
                            fee_growth_global1_x128: if zero_for_one {
                                pool.state.fee_growth_global1_x128
                            } else {
                                state.fee_growth_global_x128
                            },
                            seconds_per_liquidity_cumulative_x128: cache
                                .seconds_per_liquidity_cumulative_x128,
                            tick_cumulative: cache.tick_cumulative,
                            time: cache.block_timestamp,
                        };
                        let liquidity_net =
                            pool.state.ticks.entry(tick_next).or_default().cross(&globals);

                        // Moving left exits positions, so liquidity_net applies negated
                        let liquidity_net = if zero_for_one {
                            liquidity_net.checked_neg().ok_or(PoolError::LiquidityOverflow)?
                        } else {
                            liquidity_net
                        };
                        state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                        trace!(tick = tick_next, liquidity = state.liquidity, "tick crossed");
                    }

                    state.tick = if zero_for_one { tick_next - 1 } else { tick_next };
                } else if state.sqrt_price_x96 != sqrt_price_step_start_x96 {
                    // Recompute unless the price did not move
                    state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
                }

                trace!(
                    sqrt_price_x96 = %state.sqrt_price_x96,
                    tick = state.tick,
                    amount_in = %step.amount_in,
                    amount_out = %step.amount_out,
                    fee_amount = %step.fee_amount,
                    "swap step"
                );
            }

            // Update price and tick, writing an observation if the tick moved
            if state.tick != tick_start {
                pool.state
                    .oracle
                    .write(cache.block_timestamp, tick_start, cache.liquidity_start)?;
                pool.state.sqrt_price_x96 = state.sqrt_price_x96;
                pool.state.tick = state.tick;
            } else {
                pool.state.sqrt_price_x96 = state.sqrt_price_x96;
            }

            if cache.liquidity_start != state.liquidity {
                pool.state.liquidity = state.liquidity;
            }

            // Update fee growth and protocol fees
            if zero_for_one {
                pool.state.fee_growth_global0_x128 = state.fee_growth_global_x128;
                if state.protocol_fee > 0 {
                    pool.state.protocol_fees.token0 = pool
                        .state
                        .protocol_fees
                        .token0
                        .checked_add(state.protocol_fee)
                        .ok_or(PoolError::MathOverflow)?;
                }
            } else {
                pool.state.fee_growth_global1_x128 = state.fee_growth_global_x128;
                if state.protocol_fee > 0 {
                    pool.state.protocol_fees.token1 = pool
                        .state
                        .protocol_fees
                        .token1
                        .checked_add(state.protocol_fee)
                        .ok_or(PoolError::MathOverflow)?;
                }
            }

            let amount_specified_used = amount_specified
                .checked_sub(state.amount_specified_remaining)
                .ok_or(PoolError::MathOverflow)?;
            let (amount0, amount1) = if zero_for_one == exact_input {
                (amount_specified_used, state.amount_calculated)
            } else {
                (state.amount_calculated, amount_specified_used)
            };

            // Pay out first, then collect the input through the callback
            let (token0, token1, address) = (pool.token0(), pool.token1(), pool.address());
            if zero_for_one && amount1 < 0 {
                pool.ledger.transfer(token1, address, recipient, amount1.unsigned_abs())?;
            } else if !zero_for_one && amount0 < 0 {
                pool.ledger.transfer(token0, address, recipient, amount0.unsigned_abs())?;
            }

            // Only the input side is owed; the output side must not move again
            let balances_before = pool.balances();
            callee.swap_callback(pool, amount0, amount1, data)?;
            pool.check_settlement(
                balances_before,
                amount0.max(0).unsigned_abs(),
                amount1.max(0).unsigned_abs(),
            )?;

            pool.emit(PoolEvent::Swap {
                sender: callee.address(),
                recipient,
                amount0,
                amount1,
                sqrt_price_x96: state.sqrt_price_x96,
                liquidity: state.liquidity,
                tick: state.tick,
            });
            Ok((amount0, amount1))
        })
    }
}
