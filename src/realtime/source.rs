// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading sources. Called from inside the sampler's period, so captures
//! must be short and must not block.

use crate::realtime::{MonotonicClock, Reading};

/// Produces one reading on demand.
pub trait ReadingSource: Send {
    /// Capture a reading tagged with `sequence`. Always succeeds.
    fn capture(&mut self, sequence: u32) -> Reading;
}

/// Temperature centre, milli-degrees C.
const TEMPERATURE_BASE: i32 = 25_000;
/// Temperature spread, milli-degrees C (base ± half).
const TEMPERATURE_SPAN: u32 = 5_000;
/// Humidity centre, milli-percent.
const HUMIDITY_BASE: i32 = 50_000;
/// Humidity spread, milli-percent (base ± half).
const HUMIDITY_SPAN: u32 = 10_000;

/// Simulated temperature/humidity sensor whose values are derived from the
/// clock: 22.5 - 27.5 C and 45 - 55 % RH.
#[derive(Debug)]
pub struct SimulatedSensor<C> {
    clock: C,
}

impl<C: MonotonicClock> SimulatedSensor<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn vary(now: u32, base: i32, span: u32) -> i32 {
        // (now % span) < span <= i32::MAX, so the cast cannot overflow.
        base + (now % span) as i32 - (span / 2) as i32
    }
}

impl<C: MonotonicClock> ReadingSource for SimulatedSensor<C> {
    fn capture(&mut self, sequence: u32) -> Reading {
        let now = self.clock.now_ms();
        Reading {
            timestamp: now,
            temperature: Self::vary(now, TEMPERATURE_BASE, TEMPERATURE_SPAN),
            humidity: Self::vary(now, HUMIDITY_BASE, HUMIDITY_SPAN),
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::ManualClock;
    use std::sync::Arc;

    #[test]
    fn test_capture_fields() {
        let mut sensor = SimulatedSensor::new(ManualClock::new(1_234));
        let reading = sensor.capture(42);

        assert_eq!(reading.timestamp, 1_234);
        assert_eq!(reading.sequence, 42);
        assert_eq!(reading.temperature, 25_000 + 1_234 - 2_500);
        assert_eq!(reading.humidity, 50_000 + 1_234 - 5_000);
    }

    #[test]
    fn test_values_stay_in_range() {
        let clock = Arc::new(ManualClock::new(0));
        let mut sensor = SimulatedSensor::new(Arc::clone(&clock));

        for step in 0..20_000u32 {
            clock.set(step.wrapping_mul(7_919));
            let reading = sensor.capture(step);
            assert!((22_500..27_500).contains(&reading.temperature));
            assert!((45_000..55_000).contains(&reading.humidity));
        }
    }

    #[test]
    fn test_capture_after_clock_wrap() {
        let clock = Arc::new(ManualClock::new(u32::MAX));
        let mut sensor = SimulatedSensor::new(Arc::clone(&clock));
        let before = sensor.capture(0);

        clock.advance(1);
        let after = sensor.capture(1);

        assert_eq!(before.timestamp, u32::MAX);
        assert_eq!(after.timestamp, 0);
        assert_eq!(after.temperature, 22_500);
    }
}
