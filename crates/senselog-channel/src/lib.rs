// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fixed-capacity FIFO channel for handing values between threads.
//!
//! The publishing side never blocks: when the buffer is full the value is
//! handed back to the caller, who decides whether the loss is worth
//! reporting. The receiving side parks until a value is available.
//!
//! # Example
//!
//! ```
//! use senselog_channel::{BoundedChannel, TryPublishError};
//!
//! let channel = BoundedChannel::<u32>::new(2).unwrap();
//! channel.try_publish(1).unwrap();
//! channel.try_publish(2).unwrap();
//! assert!(matches!(channel.try_publish(3), Err(TryPublishError::Full(3))));
//!
//! assert_eq!(channel.receive_blocking(), 1);
//! assert_eq!(channel.receive_blocking(), 2);
//! ```

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel capacity must be at least 1")]
    ZeroCapacity,
}

/// Returned by [`BoundedChannel::try_publish`] when no slot is free.
///
/// Carries the rejected value so the caller still owns it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TryPublishError<T> {
    #[error("Channel full")]
    Full(T),
}

impl<T> TryPublishError<T> {
    /// Recover the value that could not be published.
    pub fn into_inner(self) -> T {
        match self {
            TryPublishError::Full(value) => value,
        }
    }
}

/// Running counters of channel traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Values accepted by `try_publish`.
    pub published: u64,
    /// Values rejected because the channel was full.
    pub rejected: u64,
    /// Values handed to a receiver.
    pub received: u64,
}

/// Ring storage guarded by the channel's mutex.
struct Ring<T> {
    /// Slot storage, `capacity` entries.
    slots: Box<[Option<T>]>,
    /// Index of the oldest buffered value.
    head: usize,
    /// Number of buffered values.
    len: usize,
}

impl<T> Ring<T> {
    fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, value: T) -> Result<(), T> {
        if self.len == self.capacity() {
            return Err(value);
        }

        let tail = (self.head + self.len) % self.capacity();
        self.slots[tail] = Some(value);
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        value
    }
}

/// Traffic counters, kept apart from the ring so a rejected publish never
/// touches buffered state.
#[derive(Default)]
struct Counters {
    published: AtomicU64,
    rejected: AtomicU64,
    received: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> ChannelStats {
        ChannelStats {
            published: self.published.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
        }
    }
}

/// A fixed-capacity, thread-safe FIFO channel.
///
/// Every mutation happens under a single internal mutex, so concurrent
/// publishers and receivers always observe a consistent count. Share it
/// between threads behind an `Arc`.
pub struct BoundedChannel<T> {
    ring: Mutex<Ring<T>>,
    /// Signalled after a value has been written into the ring.
    not_empty: Condvar,
    counters: Counters,
}

impl<T> BoundedChannel<T> {
    /// Create a channel holding at most `capacity` values.
    ///
    /// The buffer is allocated up front and never grows.
    pub fn new(capacity: usize) -> Result<Self, ChannelError> {
        if capacity == 0 {
            return Err(ChannelError::ZeroCapacity);
        }

        Ok(Self {
            ring: Mutex::new(Ring::with_capacity(capacity)),
            not_empty: Condvar::new(),
            counters: Counters::default(),
        })
    }

    /// Copy `value` into the channel if a slot is free.
    ///
    /// Never blocks. When the channel is full the value is returned inside
    /// [`TryPublishError::Full`] and the buffered contents are untouched.
    pub fn try_publish(&self, value: T) -> Result<(), TryPublishError<T>> {
        let mut ring = self.ring.lock();
        if let Err(value) = ring.push(value) {
            drop(ring);
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(TryPublishError::Full(value));
        }
        self.counters.published.fetch_add(1, Ordering::Relaxed);
        // Notify with the value already in the ring, so a waiter that wakes
        // up is guaranteed to find it.
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the oldest value, parking the caller while the
    /// channel is empty.
    pub fn receive_blocking(&self) -> T {
        let mut ring = self.ring.lock();
        loop {
            if let Some(value) = ring.pop() {
                return self.delivered(value);
            }
            self.not_empty.wait(&mut ring);
        }
    }

    /// Like [`receive_blocking`](Self::receive_blocking), but gives up after
    /// `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut ring = self.ring.lock();
        loop {
            if let Some(value) = ring.pop() {
                return Some(self.delivered(value));
            }
            if self.not_empty.wait_until(&mut ring, deadline).timed_out() {
                return ring.pop().map(|value| self.delivered(value));
            }
        }
    }

    /// Remove and return the oldest value without waiting.
    pub fn try_receive(&self) -> Option<T> {
        let value = self.ring.lock().pop();
        value.map(|value| self.delivered(value))
    }

    /// Number of buffered values.
    pub fn len(&self) -> usize {
        self.ring.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        let ring = self.ring.lock();
        ring.len == ring.capacity()
    }

    /// Capacity fixed at construction.
    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }

    /// Snapshot of the traffic counters.
    pub fn stats(&self) -> ChannelStats {
        self.counters.snapshot()
    }

    fn delivered(&self, value: T) -> T {
        self.counters.received.fetch_add(1, Ordering::Relaxed);
        value
    }
}

impl<T> std::fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.ring.lock();
        f.debug_struct("BoundedChannel")
            .field("capacity", &ring.capacity())
            .field("len", &ring.len)
            .field("stats", &self.counters.snapshot())
            .finish()
    }
}
