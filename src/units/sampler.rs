// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Periodic sampler unit.
//!
//! Each period: capture a reading, publish it without blocking, sleep until
//! the next deadline. A full channel costs one reading, never a period.

use crate::realtime::{Reading, ReadingSource};
use crate::sink::OutputSink;
use crate::units::{Scheduler, Ticker};
use senselog_channel::{BoundedChannel, TryPublishError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};

/// What happened to a captured reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Published(Reading),
    /// The channel was full; the reading is gone.
    Dropped(Reading),
}

impl SampleOutcome {
    pub fn reading(&self) -> Reading {
        match self {
            SampleOutcome::Published(r) | SampleOutcome::Dropped(r) => *r,
        }
    }
}

pub struct Sampler<S, O> {
    source: S,
    channel: Arc<BoundedChannel<Reading>>,
    /// Receives the drop warnings.
    sink: O,
    period: Duration,
    /// Sequence number of the next capture.
    sequence: u32,
    dropped: u64,
}

impl<S: ReadingSource, O: OutputSink> Sampler<S, O> {
    pub fn new(
        source: S,
        channel: Arc<BoundedChannel<Reading>>,
        sink: O,
        period: Duration,
    ) -> Self {
        Self {
            source,
            channel,
            sink,
            period,
            sequence: 0,
            dropped: 0,
        }
    }

    /// Readings lost to a full channel so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Capture one reading and try to publish it. Never blocks.
    pub fn step(&mut self) -> SampleOutcome {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);

        let reading = self.source.capture(sequence);
        match self.channel.try_publish(reading) {
            Ok(()) => {
                trace!("Published sample {}", sequence);
                SampleOutcome::Published(reading)
            }
            Err(TryPublishError::Full(reading)) => {
                self.dropped += 1;
                self.sink
                    .warn(&format!("Channel full, dropping sample {}", sequence));
                SampleOutcome::Dropped(reading)
            }
        }
    }

    /// Sample forever at the configured period.
    pub fn run<K: Scheduler>(mut self, scheduler: &K) -> ! {
        info!("Sampler unit started ({:?} period)", self.period);

        let mut ticker = Ticker::new(self.period, Instant::now());
        loop {
            self.step();

            let tick = ticker.next_delay(Instant::now());
            if tick.skipped > 0 {
                warn!("Sampler overran its period, skipping {} sample(s)", tick.skipped);
            }
            scheduler.sleep(tick.delay);
        }
    }
}
