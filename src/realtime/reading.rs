// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sensor reading passed from the sampler to the consumer.

use std::fmt;

/// Fixed-point scale of `temperature` and `humidity`.
pub const MILLI: i32 = 1000;

/// One captured sensor sample.
///
/// Copied into the channel by the sampler and out of it by the consumer;
/// never shared by reference between units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Monotonic capture time in milliseconds. Wraps.
    pub timestamp: u32,
    /// Milli-degrees Celsius.
    pub temperature: i32,
    /// Milli-percent relative humidity.
    pub humidity: i32,
    /// Capture counter, one per sample including dropped ones. Wraps.
    pub sequence: u32,
}

impl Reading {
    /// Whole and fractional parts of a milli-unit value, sign kept apart so
    /// that e.g. -1500 renders as `-1.500` rather than `-1.-500`.
    fn split_milli(value: i32) -> (&'static str, u32, u32) {
        let sign = if value < 0 { "-" } else { "" };
        let abs = value.unsigned_abs();
        (sign, abs / MILLI as u32, abs % MILLI as u32)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (t_sign, t_int, t_frac) = Self::split_milli(self.temperature);
        let (h_sign, h_int, h_frac) = Self::split_milli(self.humidity);

        // Humidity is shown with two decimals: milli-percent / 10.
        write!(
            f,
            "[{}] seq={} temp={}{}.{:03} C, humid={}{}.{:02} %",
            self.timestamp,
            self.sequence,
            t_sign,
            t_int,
            t_frac,
            h_sign,
            h_int,
            h_frac / 10
        )
    }
}
