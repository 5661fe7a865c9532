// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Execution units of the pipeline and the scheduler abstraction that runs
//! them.
//!
//! - The sampler suspends only in its fixed-interval sleep.
//! - The consumer suspends only while the channel is empty.

pub mod consumer;
pub mod sampler;
pub mod scheduler;
pub mod ticker;

pub use consumer::Consumer;
pub use sampler::{SampleOutcome, Sampler};
pub use scheduler::{Priority, Scheduler, SchedulerError, ThreadScheduler, UnitHandle, UnitSpec};
pub use ticker::{Tick, Ticker};
