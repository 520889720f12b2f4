use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, PoolError>;

/// Reason a tick range was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Lower tick is not strictly below the upper tick
    #[error("lower tick must be below upper tick")]
    LowerNotBelowUpper,
    /// Lower tick is below MIN_TICK
    #[error("lower tick below minimum")]
    LowerBelowMin,
    /// Upper tick is above MAX_TICK
    #[error("upper tick above maximum")]
    UpperAboveMax,
    /// A bound is not a multiple of the pool's tick spacing
    #[error("tick not aligned to spacing")]
    NotOnSpacing,
}

/// Pool Error Codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    // ═══════════════════════════════════════════════════════════════════════
    // MATH ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in checked operation or narrowing cast
    #[error("Math overflow")]
    MathOverflow,

    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,

    // ═══════════════════════════════════════════════════════════════════════
    // TICK ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick outside [MIN_TICK, MAX_TICK]
    #[error("Tick out of bounds")]
    TickOutOfBounds,

    /// Position range rejected
    #[error("Invalid tick range: {0}")]
    InvalidRange(RangeError),

    /// Tick read as a range bound was never initialized
    #[error("Tick not initialized")]
    TickNotInitialized,

    // ═══════════════════════════════════════════════════════════════════════
    // PRICE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Initial sqrt price outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)
    #[error("Invalid initial price")]
    InvalidPrice,

    /// Sqrt price argument outside the representable range
    #[error("Sqrt price out of bounds")]
    PriceOutOfBounds,

    /// Swap price limit not beyond the current price in the swap direction
    #[error("Invalid sqrt price limit")]
    InvalidPriceLimit,

    // ═══════════════════════════════════════════════════════════════════════
    // LIQUIDITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Mint of zero liquidity
    #[error("Zero liquidity")]
    ZeroLiquidity,

    /// Tick gross liquidity above the per-tick cap, or active liquidity overflow
    #[error("Liquidity overflow")]
    LiquidityOverflow,

    /// Burn exceeds the position's liquidity
    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    /// Zero-delta update of a position that holds no liquidity
    #[error("Position holds no liquidity")]
    EmptyPosition,

    /// Flash loan against a pool with no in-range liquidity
    #[error("No active liquidity")]
    NoActiveLiquidity,

    /// Swap with amount_specified == 0
    #[error("Zero amount specified")]
    ZeroAmount,

    // ═══════════════════════════════════════════════════════════════════════
    // POOL ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// initialize called twice
    #[error("Pool already initialized")]
    AlreadyInitialized,

    /// Operation on a pool whose price was never set
    #[error("Pool not initialized")]
    NotInitialized,

    /// Re-entrant call while an operation holds the lock
    #[error("Pool is locked")]
    Locked,

    /// Pool configuration rejected
    #[error("Invalid pool config: {0}")]
    InvalidConfig(String),

    // ═══════════════════════════════════════════════════════════════════════
    // FEE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Protocol fee split neither 0 nor within [4, 10]
    #[error("Invalid protocol fee split")]
    InvalidFeeProtocolSplit,

    // ═══════════════════════════════════════════════════════════════════════
    // ORACLE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Requested target predates the oldest observation
    #[error("Observation not available")]
    ObservationNotAvailable,

    /// Oracle read before any observation was written
    #[error("Oracle uninitialized")]
    OracleUninitialized,

    // ═══════════════════════════════════════════════════════════════════════
    // SETTLEMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Pool balance did not grow by the owed amount during a callback
    #[error("Insufficient payment of token{token}")]
    InsufficientPayment { token: u8 },

    /// Ledger debit exceeds the account balance
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Callee reported a failure
    #[error("Callback failed: {0}")]
    Callback(String),
}

impl PoolError {
    /// Shorthand used by range checks
    pub fn range(reason: RangeError) -> Self {
        PoolError::InvalidRange(reason)
    }
}
