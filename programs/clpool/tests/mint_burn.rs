mod common;

use clpool::{PoolError, PoolEvent, PositionKey, RangeError, Tick, U256};
use common::*;

#[test]
fn test_initial_full_range_mint() {
    let f = fixture_one_to_ten();
    assert_eq!(f.pool.balance0(), 9996);
    assert_eq!(f.pool.balance1(), 1000);
    assert_eq!(f.pool.liquidity(), 3161);
    assert_eq!(f.pool.slot0().tick, -23028);
    assert_eq!(f.balance(TOKEN0, WALLET), STARTING_BALANCE - 9996);
}

#[test]
fn test_mint_rejects_invalid_ranges() {
    let mut f = fixture_one_to_ten();
    assert_eq!(
        f.mint(WALLET, 1, 0, 1),
        Err(PoolError::InvalidRange(RangeError::LowerNotBelowUpper))
    );
    assert_eq!(
        f.mint(WALLET, -887_280, 0, 1),
        Err(PoolError::InvalidRange(RangeError::LowerBelowMin))
    );
    assert_eq!(
        f.mint(WALLET, 0, 887_280, 1),
        Err(PoolError::InvalidRange(RangeError::UpperAboveMax))
    );
    assert_eq!(
        f.mint(WALLET, -61, 60, 1),
        Err(PoolError::InvalidRange(RangeError::NotOnSpacing))
    );
    assert_eq!(f.mint(WALLET, -60, 60, 0), Err(PoolError::ZeroLiquidity));
}

#[test]
fn test_mint_rejects_liquidity_above_tick_cap() {
    let mut f = fixture_one_to_ten();
    let max = f.pool.max_liquidity_per_tick();
    assert_eq!(max, 11_505_743_598_341_114_571_880_798_222_544_994);
    assert_eq!(
        f.mint(WALLET, MIN_TICK_60 + 60, MAX_TICK_60 - 60, max + 1),
        Err(PoolError::LiquidityOverflow)
    );

    // The cap applies to the sum at a tick, across positions
    f.mint(WALLET, MIN_TICK_60 + 60, MAX_TICK_60 - 60, 1000).unwrap();
    assert_eq!(
        f.mint(OTHER, MIN_TICK_60 + 60, MAX_TICK_60 - 60, max - 999),
        Err(PoolError::LiquidityOverflow)
    );
}

#[test]
fn test_mint_above_current_price_takes_token0_only() {
    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, -22_980, 0, 10_000).unwrap(), (21_549, 0));
    assert_eq!(f.pool.balance0(), 9996 + 21_549);
    assert_eq!(f.pool.balance1(), 1000);
    // Out of range: active liquidity unchanged
    assert_eq!(f.pool.liquidity(), 3161);
}

#[test]
fn test_mint_at_max_tick() {
    let mut f = fixture_one_to_ten();
    assert_eq!(
        f.mint(WALLET, MAX_TICK_60 - 60, MAX_TICK_60, 1u128 << 102).unwrap(),
        (828_011_525, 0)
    );

    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, -22_980, MAX_TICK_60, 10_000).unwrap(), (31_549, 0));
}

#[test]
fn test_mint_below_current_price_takes_token1_only() {
    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, -46_080, -23_040, 10_000).unwrap(), (0, 2162));

    let mut f = fixture_one_to_ten();
    assert_eq!(
        f.mint(WALLET, MIN_TICK_60, MIN_TICK_60 + 60, 1u128 << 102).unwrap(),
        (0, 828_011_520)
    );

    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, MIN_TICK_60, -23_040, 10_000).unwrap(), (0, 3161));
}

#[test]
fn test_mint_in_range_takes_both_tokens() {
    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, MIN_TICK_60 + 60, MAX_TICK_60 - 60, 100).unwrap(), (317, 32));
    assert_eq!(f.pool.liquidity(), 3261);

    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, MIN_TICK_60, MAX_TICK_60, 10_000).unwrap(), (31_623, 3163));
}

#[test]
fn test_in_range_mint_writes_observation() {
    let mut f = fixture_one_to_ten();
    f.advance(1);
    f.mint(WALLET, MIN_TICK_60, MAX_TICK_60, 100).unwrap();

    let observation = f.pool.observations(0);
    assert!(observation.initialized);
    assert_eq!(observation.block_timestamp, TEST_POOL_START_TIME + 1);
    assert_eq!(observation.tick_cumulative, -23_028);
    assert_eq!(
        observation.seconds_per_liquidity_cumulative_x128,
        dec("107650226801941937191829992860413859")
    );
}

#[test]
fn test_burn_above_range_returns_token0() {
    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, -240, 0, 10_000).unwrap(), (121, 0));
    assert_eq!(f.pool.burn(WALLET, -240, 0, 10_000).unwrap(), (120, 0));

    let key = PositionKey::new(WALLET, -240, 0);
    assert_eq!(f.pool.positions(&key).tokens_owed0, 120);
    assert_eq!(f.pool.balance0(), 9996 + 121);

    let collected = f.pool.collect(WALLET, OTHER, -240, 0, u128::MAX, u128::MAX).unwrap();
    assert_eq!(collected, (120, 0));
    assert_eq!(f.pool.balance0(), 9996 + 1);
    assert_eq!(f.balance(TOKEN0, OTHER), STARTING_BALANCE + 120);
    assert_eq!(f.pool.positions(&key).tokens_owed0, 0);
}

#[test]
fn test_burn_below_and_in_range() {
    let mut f = fixture_one_to_ten();
    assert_eq!(f.mint(WALLET, -46_080, -46_020, 10_000).unwrap(), (0, 4));
    assert_eq!(f.pool.burn(WALLET, -46_080, -46_020, 10_000).unwrap(), (0, 3));

    let mut f = fixture_one_to_ten();
    f.mint(WALLET, MIN_TICK_60 + 60, MAX_TICK_60 - 60, 100).unwrap();
    assert_eq!(f.pool.burn(WALLET, MIN_TICK_60 + 60, MAX_TICK_60 - 60, 100).unwrap(), (316, 31));
    assert_eq!(f.pool.liquidity(), 3161);
}

#[test]
fn test_burn_clears_ticks_and_bitmap() {
    let mut f = fixture_one_to_ten();
    f.mint(WALLET, -240, 0, 10_000).unwrap();
    assert!(f.pool.ticks(-240).initialized);
    assert!(!f.pool.tick_bitmap(-1).is_zero());

    f.pool.burn(WALLET, -240, 0, 10_000).unwrap();
    assert_eq!(f.pool.ticks(-240), Tick::default());
    assert_eq!(f.pool.ticks(0), Tick::default());
    assert!(f.pool.tick_bitmap(-1).is_zero());
    assert!(f.pool.tick_bitmap(0).is_zero());
}

#[test]
fn test_shared_tick_survives_partial_burn() {
    let mut f = fixture_one_to_ten();
    f.mint(WALLET, -240, 0, 100).unwrap();
    f.mint(WALLET, -240, 60, 250).unwrap();
    f.pool.burn(WALLET, -240, 0, 100).unwrap();

    let tick = f.pool.ticks(-240);
    assert_eq!(tick.liquidity_gross, 250);
    assert_eq!(tick.liquidity_net, 250);
    assert_eq!(f.pool.ticks(0), Tick::default());
    assert_eq!(f.pool.ticks(60).liquidity_net, -250);
}

#[test]
fn test_burn_more_than_position_fails() {
    let mut f = fixture_one_to_ten();
    f.mint(WALLET, -240, 0, 100).unwrap();
    assert_eq!(f.pool.burn(WALLET, -240, 0, 101), Err(PoolError::InsufficientLiquidity));
    assert_eq!(f.pool.burn(OTHER, -240, 0, 1), Err(PoolError::InsufficientLiquidity));
}

#[test]
fn test_poke_of_empty_position_fails() {
    let mut f = fixture_one_to_ten();
    assert_eq!(f.pool.burn(OTHER, -240, 0, 0), Err(PoolError::EmptyPosition));
}

#[test]
fn test_poke_settles_fees() {
    let mut f = fixture_one_to_ten();
    let (lower, upper) = (MIN_TICK_60 + 60, MAX_TICK_60 - 60);
    f.mint(OTHER, lower, upper, 1_000_000_000_000_000_000).unwrap();
    f.swap_exact0_for1(100_000_000_000_000_000, WALLET).unwrap();
    f.swap_exact1_for0(10_000_000_000_000_000, WALLET).unwrap();

    f.mint(WALLET, lower, upper, 1).unwrap();
    let key = PositionKey::new(WALLET, lower, upper);
    let position = f.pool.positions(&key);
    assert_eq!(position.liquidity, 1);
    assert_eq!(
        position.fee_growth_inside0_last_x128,
        dec("102084710076281216349243831104605583")
    );
    assert_eq!(
        position.fee_growth_inside1_last_x128,
        dec("10208471007628121634924383110460558")
    );
    assert_eq!((position.tokens_owed0, position.tokens_owed1), (0, 0));

    f.pool.burn(WALLET, lower, upper, 1).unwrap();
    let position = f.pool.positions(&key);
    assert_eq!(position.liquidity, 0);
    assert_eq!((position.tokens_owed0, position.tokens_owed1), (3, 0));
}

#[test]
fn test_burn_credits_fees_and_principal() {
    let mut f = fixture_one_to_one();
    f.advance(10);
    let amount = 1_000_000_000_000_000_000;
    f.mint(OTHER, MIN_TICK_60, MAX_TICK_60, amount).unwrap();

    assert_eq!(
        f.swap_exact0_for1(amount, WALLET).unwrap(),
        (1_000_000_000_000_000_000, -748_311_233_425_068_801)
    );
    assert_eq!(
        f.swap_exact1_for0(amount, WALLET).unwrap(),
        (-1_226_651_515_836_454_174, 1_000_000_000_000_000_000)
    );
    assert_eq!(
        f.pool.burn(OTHER, MIN_TICK_60, MAX_TICK_60, amount).unwrap(),
        (923_449_494_721_181_941, 1_082_896_255_524_977_065)
    );

    let key = PositionKey::new(OTHER, MIN_TICK_60, MAX_TICK_60);
    let position = f.pool.positions(&key);
    assert_eq!(position.liquidity, 0);
    assert_eq!(position.tokens_owed0, 924_449_494_721_181_940);
    assert_eq!(position.tokens_owed1, 1_083_896_255_524_977_065);
    assert_eq!(
        position.fee_growth_inside0_last_x128,
        dec("340282366920938463463374607431768211")
    );
    assert_eq!(
        position.fee_growth_inside1_last_x128,
        dec("340282366920938576890830247744589365")
    );

    // Ticks stay: the other full-range position still references them
    assert!(f.pool.ticks(MIN_TICK_60).initialized);
    assert!(f.pool.ticks(MAX_TICK_60).initialized);
}

#[test]
fn test_collect_settles_fees_of_live_position() {
    let mut f = fixture_one_to_one();
    f.swap_exact0_for1(1_000_000_000_000_000, OTHER).unwrap();
    f.swap_exact1_for0(1_000_000_000_000_000, OTHER).unwrap();

    let collected = f
        .pool
        .collect(WALLET, WALLET, MIN_TICK_60, MAX_TICK_60, u128::MAX, u128::MAX)
        .unwrap();
    assert_eq!(collected, (2_999_999_999_999, 2_999_999_999_999));

    // Partial request leaves the rest owed
    f.swap_exact0_for1(1_000_000_000_000_000, OTHER).unwrap();
    let (amount0, _) = f.pool.collect(WALLET, WALLET, MIN_TICK_60, MAX_TICK_60, 1, 0).unwrap();
    assert_eq!(amount0, 1);
    let key = PositionKey::new(WALLET, MIN_TICK_60, MAX_TICK_60);
    assert!(f.pool.positions(&key).tokens_owed0 > 0);
}

#[test]
fn test_collect_of_unknown_position_is_empty() {
    let mut f = fixture_one_to_ten();
    assert_eq!(
        f.pool.collect(OTHER, OTHER, -60, 60, u128::MAX, u128::MAX).unwrap(),
        (0, 0)
    );
}

#[test]
fn test_unpaid_mint_rolls_back() {
    let mut f = fixture_one_to_ten();
    let state_before = f.pool.state().clone();
    let ledger_before = f.pool.ledger().clone();
    let events_before = f.pool.events().len();

    f.wallet.calls = 0;
    f.wallet.skip_payment = true;
    assert_eq!(
        f.mint(WALLET, MIN_TICK_60, MAX_TICK_60, 100),
        Err(PoolError::InsufficientPayment { token: 0 })
    );
    assert_eq!(f.wallet.calls, 1);
    assert_eq!(f.pool.state(), &state_before);
    assert_eq!(f.pool.ledger(), &ledger_before);
    assert_eq!(f.pool.events().len(), events_before);
    assert!(f.pool.slot0().unlocked);

    // Only token1 owed: the token1 check fails
    assert_eq!(
        f.mint(WALLET, -46_080, -23_040, 10_000),
        Err(PoolError::InsufficientPayment { token: 1 })
    );
}

#[test]
fn test_mint_callback_cannot_withdraw_unowed_token() {
    let mut f = fixture_one_to_ten();
    let ledger_before = f.pool.ledger().clone();

    // Above the current price only token0 is owed
    f.wallet.skim = true;
    assert_eq!(
        f.mint(WALLET, -22_980, 0, 10_000),
        Err(PoolError::InsufficientPayment { token: 1 })
    );
    assert_eq!(f.pool.ledger(), &ledger_before);
    assert_eq!(f.pool.balance1(), 1000);

    // In range both are owed; one unit short on token0
    assert_eq!(
        f.mint(WALLET, -24_000, -22_020, 10_000),
        Err(PoolError::InsufficientPayment { token: 0 })
    );
    assert_eq!(f.pool.liquidity(), 3161);
}

#[test]
fn test_reentry_from_mint_callback_is_locked() {
    let mut f = fixture_one_to_ten();
    f.wallet.reenter = true;
    f.mint(WALLET, -240, 0, 100).unwrap();
    assert_eq!(f.wallet.reentry_result, Some(Err(PoolError::Locked)));
    assert!(f.pool.slot0().unlocked);
}

#[test]
fn test_mint_and_burn_events() {
    let mut f = fixture_one_to_ten();
    f.pool.take_events();
    f.mint(OTHER, -240, 0, 10_000).unwrap();
    f.pool.burn(OTHER, -240, 0, 10_000).unwrap();
    f.pool.collect(OTHER, WALLET, -240, 0, 50, 0).unwrap();

    assert_eq!(
        f.pool.take_events(),
        vec![
            PoolEvent::Mint {
                sender: WALLET,
                owner: OTHER,
                tick_lower: -240,
                tick_upper: 0,
                amount: 10_000,
                amount0: 121,
                amount1: 0,
            },
            PoolEvent::Burn {
                owner: OTHER,
                tick_lower: -240,
                tick_upper: 0,
                amount: 10_000,
                amount0: 120,
                amount1: 0,
            },
            PoolEvent::Collect {
                owner: OTHER,
                recipient: WALLET,
                tick_lower: -240,
                tick_upper: 0,
                amount0: 50,
                amount1: 0,
            },
        ]
    );
}

#[test]
fn test_operations_require_initialization() {
    let mut f = fixture(clpool::FeeAmount::Medium);
    assert_eq!(f.mint(WALLET, -60, 60, 1), Err(PoolError::NotInitialized));
    assert_eq!(f.pool.burn(WALLET, -60, 60, 0), Err(PoolError::NotInitialized));
    assert_eq!(f.pool.observe(&[0]), Err(PoolError::NotInitialized));
    assert_eq!(f.pool.slot0().sqrt_price_x96, U256::zero());
}
