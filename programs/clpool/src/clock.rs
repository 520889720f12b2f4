//! Time source for the oracle and tick snapshots
//!
//! Timestamps are seconds truncated to 32 bits; every consumer handles
//! wraparound.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Current timestamp, mod 2^32
    fn now(&self) -> u32;
}

/// Wall-clock UNIX time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default()
    }
}

/// Settable clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU32>);

impl ManualClock {
    pub fn new(start: u32) -> Self {
        ManualClock(Arc::new(AtomicU32::new(start)))
    }

    pub fn set(&self, time: u32) {
        self.0.store(time, Ordering::SeqCst);
    }

    /// Move time forward, wrapping at 2^32
    pub fn advance(&self, seconds: u32) {
        let now = self.0.load(Ordering::SeqCst);
        self.0.store(now.wrapping_add(seconds), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}
