// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Consumer unit: waits on the channel and renders each reading.
//!
//! Assumes rendering is faster than the sampling period; nothing pushes
//! back on the sampler if it is not.

use crate::realtime::Reading;
use crate::sink::OutputSink;
use senselog_channel::BoundedChannel;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Consumer<O> {
    channel: Arc<BoundedChannel<Reading>>,
    sink: O,
    last_sequence: Option<u32>,
    missed: u64,
}

impl<O: OutputSink> Consumer<O> {
    pub fn new(channel: Arc<BoundedChannel<Reading>>, sink: O) -> Self {
        Self {
            channel,
            sink,
            last_sequence: None,
            missed: 0,
        }
    }

    /// Readings inferred lost from gaps in the sequence numbers.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Wait for the next reading, render it and return it.
    pub fn step(&mut self) -> Reading {
        let reading = self.channel.receive_blocking();
        self.track_sequence(reading.sequence);
        self.sink.emit(&reading.to_string());
        reading
    }

    /// Consume forever.
    pub fn run(mut self) -> ! {
        info!("Consumer unit started");
        loop {
            self.step();
        }
    }

    fn track_sequence(&mut self, sequence: u32) {
        if let Some(last) = self.last_sequence {
            let gap = sequence.wrapping_sub(last.wrapping_add(1));
            if gap != 0 {
                self.missed += u64::from(gap);
                warn!("Sequence gap: {} reading(s) missed before seq {}", gap, sequence);
            }
        }
        self.last_sequence = Some(sequence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn reading(sequence: u32) -> Reading {
        Reading {
            timestamp: sequence.wrapping_mul(1000),
            temperature: 25_000,
            humidity: 50_000,
            sequence,
        }
    }

    fn consumer(capacity: usize) -> (Consumer<Arc<MemorySink>>, Arc<MemorySink>) {
        let channel = Arc::new(BoundedChannel::new(capacity).unwrap());
        let sink = Arc::new(MemorySink::new());
        (Consumer::new(channel, Arc::clone(&sink)), sink)
    }

    #[test]
    fn test_renders_in_fifo_order() {
        let (mut consumer, sink) = consumer(4);
        for seq in 0..3 {
            consumer.channel.try_publish(reading(seq)).unwrap();
        }

        for seq in 0..3 {
            assert_eq!(consumer.step(), reading(seq));
        }
        assert_eq!(
            sink.lines(),
            vec![
                "[0] seq=0 temp=25.000 C, humid=50.00 %",
                "[1000] seq=1 temp=25.000 C, humid=50.00 %",
                "[2000] seq=2 temp=25.000 C, humid=50.00 %",
            ]
        );
        assert_eq!(consumer.missed(), 0);
    }

    #[test]
    fn test_detects_gap() {
        let (mut consumer, _sink) = consumer(4);
        for seq in [0, 1, 4, 5] {
            consumer.channel.try_publish(reading(seq)).unwrap();
        }

        for _ in 0..4 {
            consumer.step();
        }
        assert_eq!(consumer.missed(), 2);
    }

    #[test]
    fn test_wrapping_sequence_is_contiguous() {
        let (mut consumer, _sink) = consumer(4);
        consumer.channel.try_publish(reading(u32::MAX - 1)).unwrap();
        consumer.channel.try_publish(reading(u32::MAX)).unwrap();
        consumer.channel.try_publish(reading(0)).unwrap();

        for _ in 0..3 {
            consumer.step();
        }
        assert_eq!(consumer.missed(), 0);
    }

    #[test]
    fn test_waits_for_data() {
        let (consumer, sink) = consumer(2);
        let channel = Arc::clone(&consumer.channel);
        let (tx, rx) = mpsc::channel();

        let unit = thread::spawn(move || {
            let mut consumer = consumer;
            tx.send(consumer.step()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        assert!(sink.is_empty());

        channel.try_publish(reading(9)).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(reading(9)));
        unit.join().unwrap();
        assert_eq!(sink.len(), 1);
    }
}
