#![allow(dead_code)]

use clpool::constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};
use clpool::utils::encode_price_sqrt;
use clpool::{
    Address, FeeAmount, InMemoryLedger, ManualClock, Pool, PoolCallee, PoolConfig, PoolError,
    Result, TokenLedger, U256,
};
use tracing_subscriber::EnvFilter;

pub const TEST_POOL_START_TIME: u32 = 1_601_906_400;

pub const TOKEN0: Address = Address::repeat_byte(0x10);
pub const TOKEN1: Address = Address::repeat_byte(0x20);
pub const POOL: Address = Address::repeat_byte(0xcc);
pub const WALLET: Address = Address::repeat_byte(0x01);
pub const OTHER: Address = Address::repeat_byte(0x02);

/// Usable tick bounds at spacing 60
pub const MIN_TICK_60: i32 = -887_220;
pub const MAX_TICK_60: i32 = 887_220;

pub const STARTING_BALANCE: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn price(reserve1: u128, reserve0: u128) -> U256 {
    encode_price_sqrt(reserve1, reserve0).unwrap()
}

pub fn dec(value: &str) -> U256 {
    U256::from_dec_str(value).unwrap()
}

/// Settles callbacks by transferring from its own account
#[derive(Debug, Default)]
pub struct TestCallee {
    pub address: Address,
    /// Pay nothing, to exercise the payment checks
    pub skip_payment: bool,
    /// Attempt a nested pool call from inside the callback
    pub reenter: bool,
    pub reentry_result: Option<Result<()>>,
    /// After paying, pull tokens back out of the pool's account
    pub skim: bool,
    pub calls: usize,
}

impl TestCallee {
    pub fn new(address: Address) -> Self {
        Self { address, ..Self::default() }
    }

    fn pay(&self, pool: &mut Pool<InMemoryLedger>, amount0: u128, amount1: u128) -> Result<()> {
        if self.skip_payment {
            return Ok(());
        }
        let (token0, token1, to) = (pool.token0(), pool.token1(), pool.address());
        pool.ledger_mut().transfer(token0, self.address, to, amount0)?;
        pool.ledger_mut().transfer(token1, self.address, to, amount1)?;
        if self.skim {
            self.withdraw(pool, amount0, amount1)?;
        }
        Ok(())
    }

    /// Take the whole balance (at least one unit) of a token nothing is
    /// owed on, or one unit of token0 when both are owed
    fn withdraw(&self, pool: &mut Pool<InMemoryLedger>, owed0: u128, owed1: u128) -> Result<()> {
        let (token0, token1, from) = (pool.token0(), pool.token1(), pool.address());
        let (token, amount) = if owed1 == 0 {
            (token1, pool.balance1().max(1))
        } else if owed0 == 0 {
            (token0, pool.balance0().max(1))
        } else {
            (token0, 1)
        };
        pool.ledger_mut().transfer(token, from, self.address, amount)
    }

    fn before_payment(&mut self, pool: &mut Pool<InMemoryLedger>) {
        self.calls += 1;
        if self.reenter {
            self.reentry_result = Some(pool.collect_protocol(self.address, 1, 1).map(|_| ()));
        }
    }
}

/// Repayment amounts for a flash callback
pub fn flash_data(pay0: u128, pay1: u128) -> Vec<u8> {
    let mut data = pay0.to_be_bytes().to_vec();
    data.extend_from_slice(&pay1.to_be_bytes());
    data
}

impl PoolCallee<InMemoryLedger> for TestCallee {
    fn address(&self) -> Address {
        self.address
    }

    fn mint_callback(
        &mut self,
        pool: &mut Pool<InMemoryLedger>,
        amount0_owed: u128,
        amount1_owed: u128,
        _data: &[u8],
    ) -> Result<()> {
        self.before_payment(pool);
        self.pay(pool, amount0_owed, amount1_owed)
    }

    fn swap_callback(
        &mut self,
        pool: &mut Pool<InMemoryLedger>,
        amount0_delta: i128,
        amount1_delta: i128,
        _data: &[u8],
    ) -> Result<()> {
        self.before_payment(pool);
        self.pay(
            pool,
            u128::try_from(amount0_delta).unwrap_or(0),
            u128::try_from(amount1_delta).unwrap_or(0),
        )
    }

    fn flash_callback(
        &mut self,
        pool: &mut Pool<InMemoryLedger>,
        _fee0: u128,
        _fee1: u128,
        data: &[u8],
    ) -> Result<()> {
        self.before_payment(pool);
        if data.len() != 32 {
            return Err(PoolError::Callback("missing repayment amounts".into()));
        }
        let mut pay0 = [0u8; 16];
        let mut pay1 = [0u8; 16];
        pay0.copy_from_slice(&data[..16]);
        pay1.copy_from_slice(&data[16..]);
        self.pay(pool, u128::from_be_bytes(pay0), u128::from_be_bytes(pay1))
    }
}

pub struct Fixture {
    pub pool: Pool<InMemoryLedger>,
    pub clock: ManualClock,
    pub wallet: TestCallee,
}

pub fn fixture(tier: FeeAmount) -> Fixture {
    init_tracing();
    let mut ledger = InMemoryLedger::new();
    for account in [WALLET, OTHER] {
        ledger.mint_to(TOKEN0, account, STARTING_BALANCE).unwrap();
        ledger.mint_to(TOKEN1, account, STARTING_BALANCE).unwrap();
    }
    let clock = ManualClock::new(TEST_POOL_START_TIME);
    let config = PoolConfig::from_tier(TOKEN0, TOKEN1, tier);
    let pool = Pool::new(POOL, config, ledger, clock.clone()).unwrap();
    Fixture { pool, clock, wallet: TestCallee::new(WALLET) }
}

/// Medium-fee pool at price 1:10 with the 3161 full-range position most tests start from
pub fn fixture_one_to_ten() -> Fixture {
    let mut f = fixture(FeeAmount::Medium);
    f.pool.initialize(price(1, 10)).unwrap();
    assert_eq!(f.mint(WALLET, MIN_TICK_60, MAX_TICK_60, 3161).unwrap(), (9996, 1000));
    f
}

/// Medium-fee pool at price 1:1 with 2e18 full-range liquidity
pub fn fixture_one_to_one() -> Fixture {
    let mut f = fixture(FeeAmount::Medium);
    f.pool.initialize(price(1, 1)).unwrap();
    let amount = 2_000_000_000_000_000_000;
    f.mint(WALLET, MIN_TICK_60, MAX_TICK_60, amount).unwrap();
    f
}

impl Fixture {
    pub fn advance(&self, seconds: u32) {
        self.clock.advance(seconds);
    }

    pub fn mint(&mut self, owner: Address, lower: i32, upper: i32, amount: u128) -> Result<(u128, u128)> {
        self.pool.mint(&mut self.wallet, owner, lower, upper, amount, &[])
    }

    pub fn swap_exact0_for1(&mut self, amount: u128, recipient: Address) -> Result<(i128, i128)> {
        self.swap(true, amount as i128, MIN_SQRT_RATIO + 1, recipient)
    }

    pub fn swap_exact1_for0(&mut self, amount: u128, recipient: Address) -> Result<(i128, i128)> {
        self.swap(false, amount as i128, MAX_SQRT_RATIO - 1, recipient)
    }

    pub fn swap0_for_exact1(&mut self, amount: u128, recipient: Address) -> Result<(i128, i128)> {
        self.swap(true, -(amount as i128), MIN_SQRT_RATIO + 1, recipient)
    }

    pub fn swap1_for_exact0(&mut self, amount: u128, recipient: Address) -> Result<(i128, i128)> {
        self.swap(false, -(amount as i128), MAX_SQRT_RATIO - 1, recipient)
    }

    pub fn swap(
        &mut self,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
        recipient: Address,
    ) -> Result<(i128, i128)> {
        self.pool.swap(
            &mut self.wallet,
            recipient,
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
            &[],
        )
    }

    pub fn flash(&mut self, amount0: u128, amount1: u128, pay0: u128, pay1: u128) -> Result<()> {
        let data = flash_data(pay0, pay1);
        self.pool.flash(&mut self.wallet, WALLET, amount0, amount1, &data)
    }

    pub fn balance(&self, token: Address, account: Address) -> u128 {
        self.pool.ledger().balance_of(token, account)
    }
}
