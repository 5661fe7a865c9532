// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fixed-period deadline keeping.
//!
//! Deadlines advance by exactly one period each tick, so time spent working
//! inside a period does not push later periods back. If the caller overruns
//! one or more deadlines they are skipped, never queued up.

use std::time::{Duration, Instant};

/// Result of [`Ticker::next_delay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// How long to sleep until the next deadline.
    pub delay: Duration,
    /// Whole periods that were overrun and will not be run.
    pub skipped: u32,
}

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// First deadline is one period after `start`.
    ///
    /// `period` must be non-zero.
    pub fn new(period: Duration, start: Instant) -> Self {
        debug_assert!(!period.is_zero());
        Self {
            period,
            next: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time to sleep from `now` until the upcoming deadline, advancing the
    /// ticker past it.
    pub fn next_delay(&mut self, now: Instant) -> Tick {
        if now <= self.next {
            let delay = self.next - now;
            self.next += self.period;
            return Tick { delay, skipped: 0 };
        }

        let behind = (now - self.next).as_nanos();
        let missed = behind / self.period.as_nanos() + 1;
        let skipped = u32::try_from(missed).unwrap_or(u32::MAX);

        let deadline = self.next + self.period * skipped;
        self.next = deadline + self.period;
        Tick {
            delay: deadline.saturating_duration_since(now),
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_work_time_is_not_compounded() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);

        // Work took 30ms in the first period, 5ms in the second.
        assert_eq!(ticker.next_delay(start + ms(30)), Tick { delay: ms(70), skipped: 0 });
        assert_eq!(ticker.next_delay(start + ms(105)), Tick { delay: ms(95), skipped: 0 });
        assert_eq!(ticker.next_delay(start + ms(200)), Tick { delay: ms(100), skipped: 0 });
    }

    #[test]
    fn test_overrun_skips_periods() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);

        // Deadline at 100 was missed; next wake is 200.
        assert_eq!(ticker.next_delay(start + ms(150)), Tick { delay: ms(50), skipped: 1 });
        // Back on schedule at 300.
        assert_eq!(ticker.next_delay(start + ms(210)), Tick { delay: ms(90), skipped: 0 });
    }

    #[test]
    fn test_long_stall_skips_many() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);

        // Deadlines 100..=400 missed; resume at 500.
        assert_eq!(ticker.next_delay(start + ms(420)), Tick { delay: ms(80), skipped: 4 });
        assert_eq!(ticker.next_delay(start + ms(500)), Tick { delay: ms(100), skipped: 0 });
    }
}
