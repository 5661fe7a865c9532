// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Acquisition side of the pipeline: the reading model, the time source and
//! the sensor that turns one into the other.
//!
//! # Timing
//!
//! Everything here runs inside the sampler's period:
//! - No blocking waits
//! - No I/O
//! - Bounded execution time

pub mod clock;
pub mod reading;
pub mod source;

pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use reading::Reading;
pub use source::{ReadingSource, SimulatedSensor};
