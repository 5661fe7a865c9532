// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Startup wiring: one channel, one sampler, one consumer.

use crate::config::PipelineConfig;
use crate::error::Error;
use crate::realtime::{Reading, ReadingSource};
use crate::sink::OutputSink;
use crate::units::{Consumer, Sampler, Scheduler, UnitHandle, UnitSpec};
use senselog_channel::BoundedChannel;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

pub const SAMPLER_UNIT: &str = "sensor";
pub const CONSUMER_UNIT: &str = "logger";

/// How often [`Pipeline::join`] checks the units.
const JOIN_POLL: Duration = Duration::from_millis(50);

type Entry = Box<dyn FnOnce() + Send + 'static>;

/// The running pipeline. Owns the handles of both units.
pub struct Pipeline {
    channel: Arc<BoundedChannel<Reading>>,
    units: Vec<UnitHandle>,
}

impl Pipeline {
    /// Build the channel and both units, then hand them to `scheduler`.
    ///
    /// Units are started most-urgent first, so with the default priorities
    /// the consumer is already waiting on the channel when the first reading
    /// is published.
    pub fn start<K, S, O>(
        config: &PipelineConfig,
        scheduler: K,
        source: S,
        sink: O,
    ) -> Result<Self, Error>
    where
        K: Scheduler + Clone + 'static,
        S: ReadingSource + 'static,
        O: OutputSink + 'static,
    {
        config.validate()?;

        let channel = Arc::new(BoundedChannel::new(config.channel.capacity)?);
        info!("Channel ready (capacity {})", channel.capacity());

        if !config.consumer.priority.outranks(config.sampler.priority) {
            warn!(
                "Consumer priority {} does not outrank sampler priority {}; \
                 rendering may delay sampling",
                config.consumer.priority, config.sampler.priority
            );
        }

        let sink = Arc::new(sink);
        let sampler = Sampler::new(
            source,
            Arc::clone(&channel),
            Arc::clone(&sink),
            config.sampler.interval(),
        );
        let consumer = Consumer::new(Arc::clone(&channel), sink);

        let sampler_scheduler = scheduler.clone();
        let sampler_entry: Entry = Box::new(move || {
            sampler.run(&sampler_scheduler);
        });
        let consumer_entry: Entry = Box::new(move || {
            consumer.run();
        });

        let mut pending = vec![
            (
                UnitSpec::new(SAMPLER_UNIT, config.sampler.priority)
                    .with_stack_size(config.sampler.stack_size),
                sampler_entry,
            ),
            (
                UnitSpec::new(CONSUMER_UNIT, config.consumer.priority)
                    .with_stack_size(config.consumer.stack_size),
                consumer_entry,
            ),
        ];
        // Stable: equal priorities keep declaration order.
        pending.sort_by_key(|(spec, _)| spec.priority);

        let mut units = Vec::with_capacity(pending.len());
        for (spec, entry) in pending {
            let unit = scheduler.spawn(spec, entry)?;
            info!("Started unit '{}' at {}", unit.name(), unit.priority());
            units.push(unit);
        }

        info!("All units spawned");
        Ok(Self { channel, units })
    }

    /// The shared channel, for diagnostics.
    pub fn channel(&self) -> &Arc<BoundedChannel<Reading>> {
        &self.channel
    }

    pub fn units(&self) -> &[UnitHandle] {
        &self.units
    }

    /// Block until any unit terminates and report it.
    ///
    /// Both units run forever, so every return is an error. The remaining
    /// units are left running; the caller is expected to exit.
    pub fn join(mut self) -> Result<(), Error> {
        if self.units.is_empty() {
            return Ok(());
        }

        loop {
            if let Some(index) = self.units.iter().position(UnitHandle::is_finished) {
                let unit = self.units.swap_remove(index);
                let name = unit.name().to_owned();
                return match unit.join() {
                    Ok(()) => Err(Error::UnitExited(name)),
                    Err(_) => Err(Error::UnitPanicked(name)),
                };
            }
            thread::sleep(JOIN_POLL);
        }
    }
}
