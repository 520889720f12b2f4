//! Oracle
//!
//! Ring buffer of time-weighted accumulators. One observation is written
//! per distinct timestamp; the buffer grows lazily toward a target length
//! and never shrinks.

use crate::constants::oracle::OBSERVATION_CARDINALITY_INIT;
use crate::constants::MASK_160;
use crate::errors::{PoolError, Result};
use crate::math::u256::{wrapping_add, wrapping_sub, U256};

/// Oracle observation - stores TWAP data points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    /// Timestamp of the observation, mod 2^32
    pub block_timestamp: u32,

    /// Cumulative tick value (tick * time elapsed)
    pub tick_cumulative: i64,

    /// Cumulative seconds per in-range liquidity, Q128.128 mod 2^160
    pub seconds_per_liquidity_cumulative_x128: U256,

    /// Whether this observation has been initialized
    pub initialized: bool,
}

impl Observation {
    /// Extrapolate this observation to a later timestamp at constant tick
    /// and liquidity. Zero liquidity counts as one.
    pub fn transform(&self, block_timestamp: u32, tick: i32, liquidity: u128) -> Observation {
        let delta = block_timestamp.wrapping_sub(self.block_timestamp);
        let seconds_per_liquidity = (U256::from(delta) << 128) / U256::from(liquidity.max(1));
        Observation {
            block_timestamp,
            tick_cumulative: self
                .tick_cumulative
                .wrapping_add((tick as i64).wrapping_mul(delta as i64)),
            seconds_per_liquidity_cumulative_x128: wrapping_add(
                self.seconds_per_liquidity_cumulative_x128,
                seconds_per_liquidity,
            ) & MASK_160,
            initialized: true,
        }
    }
}

/// `a <= b` for timestamps that may have wrapped, both assumed at or before `time`
fn lte(time: u32, a: u32, b: u32) -> bool {
    if a <= time && b <= time {
        return a <= b;
    }
    let a_adjusted = if a > time { a as u64 } else { a as u64 + (1u64 << 32) };
    let b_adjusted = if b > time { b as u64 } else { b as u64 + (1u64 << 32) };
    a_adjusted <= b_adjusted
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Oracle {
    /// Observation slots; grows to the target cardinality on demand
    observations: Vec<Observation>,

    /// Index of the most recently written observation
    pub observation_index: u16,

    /// Number of populated observations
    pub observation_cardinality: u16,

    /// Target cardinality, reached when the index next wraps
    pub observation_cardinality_next: u16,
}

impl Oracle {
    /// Initialize the oracle with first observation
    pub fn initialize(&mut self, timestamp: u32) {
        self.observations = vec![Observation {
            block_timestamp: timestamp,
            tick_cumulative: 0,
            seconds_per_liquidity_cumulative_x128: U256::zero(),
            initialized: true,
        }];
        self.observation_index = 0;
        self.observation_cardinality = OBSERVATION_CARDINALITY_INIT;
        self.observation_cardinality_next = OBSERVATION_CARDINALITY_INIT;
    }

    /// Observation at a slot, zeroed if the slot was never allocated
    pub fn observation(&self, index: u16) -> Observation {
        self.observations
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Write a new observation
    ///
    /// `tick` and `liquidity` are the values that held since the last
    /// write. At most one observation is written per timestamp. The
    /// cardinality only moves to the target when the index sits at the
    /// end of the populated range.
    pub fn write(&mut self, timestamp: u32, tick: i32, liquidity: u128) -> Result<()> {
        if self.observation_cardinality == 0 {
            return Err(PoolError::OracleUninitialized);
        }
        let last = self.observation(self.observation_index);

        // Early return if same timestamp
        if last.block_timestamp == timestamp {
            return Ok(());
        }

        let cardinality = if self.observation_cardinality_next > self.observation_cardinality
            && self.observation_index == self.observation_cardinality - 1
        {
            self.observation_cardinality_next
        } else {
            self.observation_cardinality
        };

        let index = ((self.observation_index as u32 + 1) % cardinality as u32) as u16;
        self.observations[index as usize] = last.transform(timestamp, tick, liquidity);
        self.observation_index = index;
        self.observation_cardinality = cardinality;
        Ok(())
    }

    /// Raise the target cardinality, allocating the new slots
    ///
    /// Returns the target after the call; a request at or below the
    /// current target changes nothing.
    pub fn grow(&mut self, next: u16) -> Result<u16> {
        if self.observation_cardinality == 0 {
            return Err(PoolError::OracleUninitialized);
        }
        if next <= self.observation_cardinality_next {
            return Ok(self.observation_cardinality_next);
        }
        self.observations
            .resize(next as usize, Observation::default());
        self.observation_cardinality_next = next;
        Ok(next)
    }

    /// Accumulators as of `seconds_ago` before `time`
    ///
    /// `tick` and `liquidity` are the pool's current values, used to
    /// extrapolate past the newest observation.
    pub fn observe_single(
        &self,
        time: u32,
        seconds_ago: u32,
        tick: i32,
        liquidity: u128,
    ) -> Result<(i64, U256)> {
        if self.observation_cardinality == 0 {
            return Err(PoolError::OracleUninitialized);
        }

        if seconds_ago == 0 {
            let mut last = self.observation(self.observation_index);
            if last.block_timestamp != time {
                last = last.transform(time, tick, liquidity);
            }
            return Ok((last.tick_cumulative, last.seconds_per_liquidity_cumulative_x128));
        }

        let target = time.wrapping_sub(seconds_ago);
        let (before_or_at, at_or_after) =
            self.get_surrounding_observations(time, target, tick, liquidity)?;

        if target == before_or_at.block_timestamp {
            return Ok((
                before_or_at.tick_cumulative,
                before_or_at.seconds_per_liquidity_cumulative_x128,
            ));
        }
        if target == at_or_after.block_timestamp {
            return Ok((
                at_or_after.tick_cumulative,
                at_or_after.seconds_per_liquidity_cumulative_x128,
            ));
        }

        // Interpolate between the two surrounding observations
        let observation_time_delta =
            at_or_after.block_timestamp.wrapping_sub(before_or_at.block_timestamp);
        let target_delta = target.wrapping_sub(before_or_at.block_timestamp);

        let tick_rate = at_or_after
            .tick_cumulative
            .wrapping_sub(before_or_at.tick_cumulative)
            / observation_time_delta as i64;
        let tick_cumulative = before_or_at
            .tick_cumulative
            .wrapping_add(tick_rate.wrapping_mul(target_delta as i64));

        let seconds_per_liquidity_delta = wrapping_sub(
            at_or_after.seconds_per_liquidity_cumulative_x128,
            before_or_at.seconds_per_liquidity_cumulative_x128,
        ) & MASK_160;
        let seconds_per_liquidity = wrapping_add(
            before_or_at.seconds_per_liquidity_cumulative_x128,
            seconds_per_liquidity_delta * target_delta / observation_time_delta,
        ) & MASK_160;

        Ok((tick_cumulative, seconds_per_liquidity))
    }

    /// Accumulators for each lookback in `seconds_agos`
    pub fn observe(
        &self,
        time: u32,
        seconds_agos: &[u32],
        tick: i32,
        liquidity: u128,
    ) -> Result<(Vec<i64>, Vec<U256>)> {
        if self.observation_cardinality == 0 {
            return Err(PoolError::OracleUninitialized);
        }
        let mut tick_cumulatives = Vec::with_capacity(seconds_agos.len());
        let mut seconds_per_liquidity_cumulatives = Vec::with_capacity(seconds_agos.len());
        for seconds_ago in seconds_agos {
            let (tick_cumulative, seconds_per_liquidity) =
                self.observe_single(time, *seconds_ago, tick, liquidity)?;
            tick_cumulatives.push(tick_cumulative);
            seconds_per_liquidity_cumulatives.push(seconds_per_liquidity);
        }
        Ok((tick_cumulatives, seconds_per_liquidity_cumulatives))
    }

    /// Observations immediately at or before and at or after `target`
    ///
    /// When `target` is newer than the newest observation the second
    /// element is the newest observation extrapolated to `target`.
    fn get_surrounding_observations(
        &self,
        time: u32,
        target: u32,
        tick: i32,
        liquidity: u128,
    ) -> Result<(Observation, Observation)> {
        let newest = self.observation(self.observation_index);

        if lte(time, newest.block_timestamp, target) {
            if newest.block_timestamp == target {
                return Ok((newest, Observation::default()));
            }
            return Ok((newest, newest.transform(target, tick, liquidity)));
        }

        // Oldest is the slot after the index, or slot 0 if the ring has not wrapped yet
        let mut oldest = self.observation(
            ((self.observation_index as u32 + 1) % self.observation_cardinality as u32) as u16,
        );
        if !oldest.initialized {
            oldest = self.observation(0);
        }

        if !lte(time, oldest.block_timestamp, target) {
            return Err(PoolError::ObservationNotAvailable);
        }

        self.binary_search(time, target)
    }

    /// Binary search for surrounding observations
    ///
    /// Requires `target` to lie within the populated history.
    fn binary_search(&self, time: u32, target: u32) -> Result<(Observation, Observation)> {
        let cardinality = self.observation_cardinality as u32;
        let mut left = (self.observation_index as u32 + 1) % cardinality;
        let mut right = left + cardinality - 1;

        while left <= right {
            let mid = (left + right) / 2;
            let before_or_at = self.observation((mid % cardinality) as u16);

            // Landed on an unwritten slot, search higher
            if !before_or_at.initialized {
                left = mid + 1;
                continue;
            }

            let at_or_after = self.observation(((mid + 1) % cardinality) as u16);
            let target_at_or_after = lte(time, before_or_at.block_timestamp, target);

            if target_at_or_after && lte(time, target, at_or_after.block_timestamp) {
                return Ok((before_or_at, at_or_after));
            }

            if !target_at_or_after {
                right = match mid.checked_sub(1) {
                    Some(r) => r,
                    None => break,
                };
            } else {
                left = mid + 1;
            }
        }

        Err(PoolError::ObservationNotAvailable)
    }
}
