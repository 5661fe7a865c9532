// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Senselog - periodic sensor sampling through a bounded channel.
//!
//! A sampler unit captures a reading every period and publishes it without
//! ever blocking; when the channel is full the reading is dropped. A consumer
//! unit parks on the channel and renders each reading as it arrives.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod realtime;
pub mod sink;
pub mod units;

pub use error::Error;
pub use pipeline::Pipeline;
