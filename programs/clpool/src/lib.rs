//! clpool - Concentrated Liquidity Pool Engine
//!
//! A single-pair AMM core in the Uniswap V3 model: liquidity is provided
//! over tick ranges, swaps walk the price across initialized ticks, fees
//! accrue per unit of in-range liquidity, and a ring of observations
//! backs a TWAP oracle.
//!
//! ## Architecture
//!
//! - **Math**: Q64.96 sqrt prices and Q128.128 fee growth over 256-bit words,
//!   with 512-bit intermediates for exact `mul_div`
//! - **State**: tick records, the tick bitmap, positions and the oracle ring
//! - **Instructions**: one file per pool operation, each an `impl Pool` block
//! - **Callbacks**: mint, swap and flash settle through a `PoolCallee`
//!   that pays into the pool's account on a `TokenLedger`
//!
//! ## Safety
//!
//! - Checked arithmetic everywhere except the accumulators, which wrap
//! - Every mutating operation holds a reentrancy lock and is atomic: a
//!   failed callback or payment check rolls back state, balances and events
//! - Deterministic: time comes from an injected `Clock`

pub mod callbacks;
pub mod clock;
pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;
pub mod types;
pub mod utils;

pub use callbacks::PoolCallee;
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{PoolError, RangeError, Result};
pub use events::PoolEvent;
pub use ledger::{InMemoryLedger, TokenLedger};
pub use math::u256::U256;
pub use state::{FeeAmount, Pool, PoolConfig, PoolState, Position, ProtocolFees, Slot0, Tick};
pub use types::{Address, PositionKey};
