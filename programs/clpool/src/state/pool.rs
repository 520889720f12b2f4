use std::fmt;

use tracing::warn;

use crate::clock::Clock;
use crate::errors::{PoolError, Result};
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::math::u256::U256;
use crate::state::config::PoolConfig;
use crate::state::oracle::{Observation, Oracle};
use crate::state::position::{Position, PositionMap};
use crate::state::tick::{Tick, TickMap};
use crate::state::tick_bitmap::TickBitmap;
use crate::types::{Address, PositionKey};

/// Snapshot of the pool's hot state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot0 {
    /// Current sqrt price as Q64.96
    pub sqrt_price_x96: U256,
    /// Current tick index
    pub tick: i32,
    /// Index of the most recently written observation
    pub observation_index: u16,
    /// Number of populated observations
    pub observation_cardinality: u16,
    /// Target number of observations
    pub observation_cardinality_next: u16,
    /// Protocol fee denominators packed as token0 + (token1 << 4)
    pub fee_protocol: u8,
    /// False while an operation is in progress
    pub unlocked: bool,
}

/// Protocol fees owed per token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtocolFees {
    pub token0: u128,
    pub token1: u128,
}

/// Everything an operation may mutate besides the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolState {
    /// Current sqrt price as Q64.96, zero until initialized
    pub sqrt_price_x96: U256,

    /// Current tick index
    pub tick: i32,

    /// Packed protocol fee denominators
    pub fee_protocol: u8,

    /// Reentrancy flag
    pub unlocked: bool,

    /// Total liquidity currently in range
    pub liquidity: u128,

    /// Global fee growth for token0 (Q128.128, wrapping)
    pub fee_growth_global0_x128: U256,

    /// Global fee growth for token1 (Q128.128, wrapping)
    pub fee_growth_global1_x128: U256,

    pub protocol_fees: ProtocolFees,

    pub ticks: TickMap,

    pub tick_bitmap: TickBitmap,

    pub positions: PositionMap,

    pub oracle: Oracle,
}

impl PoolState {
    pub fn is_initialized(&self) -> bool {
        !self.sqrt_price_x96.is_zero()
    }

    pub fn slot0(&self) -> Slot0 {
        Slot0 {
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick,
            observation_index: self.oracle.observation_index,
            observation_cardinality: self.oracle.observation_cardinality,
            observation_cardinality_next: self.oracle.observation_cardinality_next,
            fee_protocol: self.fee_protocol,
            unlocked: self.unlocked,
        }
    }

    /// Update in-range liquidity, handling the signed delta
    pub fn update_liquidity(&mut self, delta: i128) -> Result<()> {
        self.liquidity = crate::math::liquidity_math::add_delta(self.liquidity, delta)?;
        Ok(())
    }
}

/// A concentrated-liquidity pool for one token pair
///
/// All mutating operations live in `crate::instructions`, one file each.
pub struct Pool<L: TokenLedger + Clone> {
    pub(crate) address: Address,
    pub(crate) config: PoolConfig,
    pub(crate) max_liquidity_per_tick: u128,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) ledger: L,
    pub(crate) state: PoolState,
    pub(crate) events: Vec<PoolEvent>,
}

impl<L: TokenLedger + Clone> fmt::Debug for Pool<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("address", &self.address)
            .field("config", &self.config)
            .field("slot0", &self.state.slot0())
            .field("liquidity", &self.state.liquidity)
            .finish()
    }
}

impl<L: TokenLedger + Clone> Pool<L> {
    /// Create an uninitialized pool
    ///
    /// # Errors
    /// `InvalidConfig` if the config fails validation
    pub fn new(
        address: Address,
        config: PoolConfig,
        ledger: L,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let max_liquidity_per_tick = config.max_liquidity_per_tick();
        Ok(Self {
            address,
            config,
            max_liquidity_per_tick,
            clock: Box::new(clock),
            ledger,
            state: PoolState::default(),
            events: Vec::new(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn token0(&self) -> Address {
        self.config.token0
    }

    pub fn token1(&self) -> Address {
        self.config.token1
    }

    pub fn fee(&self) -> u32 {
        self.config.fee
    }

    pub fn tick_spacing(&self) -> i32 {
        self.config.tick_spacing
    }

    pub fn max_liquidity_per_tick(&self) -> u128 {
        self.max_liquidity_per_tick
    }

    pub fn slot0(&self) -> Slot0 {
        self.state.slot0()
    }

    pub fn liquidity(&self) -> u128 {
        self.state.liquidity
    }

    pub fn fee_growth_global0_x128(&self) -> U256 {
        self.state.fee_growth_global0_x128
    }

    pub fn fee_growth_global1_x128(&self) -> U256 {
        self.state.fee_growth_global1_x128
    }

    pub fn protocol_fees(&self) -> ProtocolFees {
        self.state.protocol_fees
    }

    /// Tick record, zeroed for ticks that are not initialized
    pub fn ticks(&self, tick: i32) -> Tick {
        self.state.ticks.get(&tick).copied().unwrap_or_default()
    }

    pub fn tick_bitmap(&self, word_pos: i16) -> U256 {
        self.state.tick_bitmap.word(word_pos)
    }

    /// Position record, zeroed for positions never touched
    pub fn positions(&self, key: &PositionKey) -> Position {
        self.state.positions.get(key).copied().unwrap_or_default()
    }

    pub fn observations(&self, index: u16) -> Observation {
        self.state.oracle.observation(index)
    }

    /// Full state, for inspection and invariant checks
    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn balance0(&self) -> u128 {
        self.ledger.balance_of(self.config.token0, self.address)
    }

    pub fn balance1(&self) -> u128 {
        self.ledger.balance_of(self.config.token1, self.address)
    }

    /// Current timestamp from the pool's clock
    pub fn now(&self) -> u32 {
        self.clock.now()
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTERNAL
    // ═══════════════════════════════════════════════════════════════════════

    pub(crate) fn emit(&mut self, event: PoolEvent) {
        event.log(self.address);
        self.events.push(event);
    }

    pub(crate) fn balances(&self) -> (u128, u128) {
        (self.balance0(), self.balance1())
    }

    /// Check that a callback left each balance at least `owed` above `before`
    ///
    /// A token with nothing owed must not drop below its snapshot, so a
    /// callee cannot settle one side and withdraw the other.
    pub(crate) fn check_settlement(
        &self,
        before: (u128, u128),
        owed0: u128,
        owed1: u128,
    ) -> Result<()> {
        let required0 = before.0.checked_add(owed0).ok_or(PoolError::MathOverflow)?;
        if self.balance0() < required0 {
            return Err(PoolError::InsufficientPayment { token: 0 });
        }
        let required1 = before.1.checked_add(owed1).ok_or(PoolError::MathOverflow)?;
        if self.balance1() < required1 {
            return Err(PoolError::InsufficientPayment { token: 1 });
        }
        Ok(())
    }

    /// Run `op` holding the reentrancy lock, atomically
    ///
    /// The state, the ledger and the event log are snapshotted once the
    /// lock is taken and restored if `op` fails, so a failed operation
    /// (including a failed callback or payment check) leaves no trace.
    ///
    /// The checkpoint is a full clone: O(ticks + positions + observation
    /// slots + ledger entries) per call, paid on success as well.
    pub(crate) fn with_lock<T>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if !self.state.is_initialized() {
            return Err(PoolError::NotInitialized);
        }
        if !self.state.unlocked {
            warn!(pool = %self.address, operation, "rejected re-entrant call");
            return Err(PoolError::Locked);
        }

        let state_checkpoint = self.state.clone();
        let ledger_checkpoint = self.ledger.clone();
        let events_checkpoint = self.events.len();

        self.state.unlocked = false;
        match op(self) {
            Ok(value) => {
                self.state.unlocked = true;
                Ok(value)
            }
            Err(err) => {
                warn!(pool = %self.address, operation, error = %err, "operation reverted");
                self.state = state_checkpoint;
                self.ledger = ledger_checkpoint;
                self.events.truncate(events_checkpoint);
                Err(err)
            }
        }
    }
}
