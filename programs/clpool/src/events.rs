//! Pool events
//!
//! Every state change the pool commits is recorded as a `PoolEvent` and
//! mirrored to the `tracing` log.

use tracing::{debug, info};

use crate::math::u256::U256;
use crate::types::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    Initialize {
        sqrt_price_x96: U256,
        tick: i32,
    },
    Mint {
        sender: Address,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        amount0: u128,
        amount1: u128,
    },
    Collect {
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0: u128,
        amount1: u128,
    },
    Burn {
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        amount0: u128,
        amount1: u128,
    },
    Swap {
        sender: Address,
        recipient: Address,
        amount0: i128,
        amount1: i128,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick: i32,
    },
    Flash {
        sender: Address,
        recipient: Address,
        amount0: u128,
        amount1: u128,
        paid0: u128,
        paid1: u128,
    },
    IncreaseObservationCardinalityNext {
        observation_cardinality_next_old: u16,
        observation_cardinality_next_new: u16,
    },
    SetFeeProtocol {
        fee_protocol0_old: u8,
        fee_protocol1_old: u8,
        fee_protocol0_new: u8,
        fee_protocol1_new: u8,
    },
    CollectProtocol {
        recipient: Address,
        amount0: u128,
        amount1: u128,
    },
}

impl PoolEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PoolEvent::Initialize { .. } => "Initialize",
            PoolEvent::Mint { .. } => "Mint",
            PoolEvent::Collect { .. } => "Collect",
            PoolEvent::Burn { .. } => "Burn",
            PoolEvent::Swap { .. } => "Swap",
            PoolEvent::Flash { .. } => "Flash",
            PoolEvent::IncreaseObservationCardinalityNext { .. } => {
                "IncreaseObservationCardinalityNext"
            }
            PoolEvent::SetFeeProtocol { .. } => "SetFeeProtocol",
            PoolEvent::CollectProtocol { .. } => "CollectProtocol",
        }
    }

    /// Log the event; configuration changes at info, activity at debug
    pub fn log(&self, pool: Address) {
        match self {
            PoolEvent::Initialize { sqrt_price_x96, tick } => {
                info!(%pool, %sqrt_price_x96, tick, "pool initialized");
            }
            PoolEvent::IncreaseObservationCardinalityNext {
                observation_cardinality_next_old,
                observation_cardinality_next_new,
            } => {
                info!(
                    %pool,
                    old = observation_cardinality_next_old,
                    new = observation_cardinality_next_new,
                    "observation cardinality next increased"
                );
            }
            PoolEvent::SetFeeProtocol {
                fee_protocol0_old,
                fee_protocol1_old,
                fee_protocol0_new,
                fee_protocol1_new,
            } => {
                info!(
                    %pool,
                    fee_protocol0_old,
                    fee_protocol1_old,
                    fee_protocol0_new,
                    fee_protocol1_new,
                    "protocol fee set"
                );
            }
            PoolEvent::Swap {
                amount0,
                amount1,
                sqrt_price_x96,
                liquidity,
                tick,
                ..
            } => {
                debug!(%pool, amount0, amount1, %sqrt_price_x96, liquidity, tick, "swap");
            }
            event => debug!(%pool, ?event, "{}", event.name()),
        }
    }
}
