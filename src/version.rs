//! Logical version stamps.
//!
//! A [`VersionSource`] hands out strictly increasing values; the scanner ticks it
//! once per changed entry. One source is shared by the whole process (pass the
//! same `Arc` to every scan), never a global.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonic version allocator.
pub trait VersionSource: Send + Sync {
    /// Advance past `hint` (and past every earlier tick) and return the new value.
    fn tick(&self, hint: u64) -> u64;
}

/// Lamport clock: `tick(hint)` returns `max(current, hint) + 1`.
#[derive(Debug, Default)]
pub struct LamportClock {
    value: AtomicU64,
}

impl LamportClock {
    pub fn new(start: u64) -> Self {
        Self {
            value: AtomicU64::new(start),
        }
    }

    /// Last value handed out (or the starting value).
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

impl VersionSource for LamportClock {
    fn tick(&self, hint: u64) -> u64 {
        let mut cur = self.value.load(Ordering::SeqCst);
        loop {
            let next = cur.max(hint) + 1;
            match self
                .value
                .compare_exchange_weak(cur, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => cur = actual,
            }
        }
    }
}
