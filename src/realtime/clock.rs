// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Monotonic millisecond time source.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A non-decreasing millisecond clock. Wraps at `u32::MAX`; wraparound is
/// expected and not an error.
pub trait MonotonicClock: Send + Sync {
    fn now_ms(&self) -> u32;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for Arc<C> {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wrap.
        self.epoch.elapsed().as_millis() as u32
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU32,
}

impl ManualClock {
    pub fn new(start_ms: u32) -> Self {
        Self {
            now: AtomicU32::new(start_ms),
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.store(ms, Ordering::Relaxed);
    }

    /// Move the clock forward, wrapping on overflow.
    pub fn advance(&self, ms: u32) {
        // fetch_add on atomics wraps.
        self.now.fetch_add(ms, Ordering::Relaxed);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.load(Ordering::Relaxed)
    }
}
