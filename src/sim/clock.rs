/// Fixed-rate tick scheduler.
///
/// The driver polls with the current time; `poll` answers whether a tick
/// is due. At most one tick per poll and no backlog: after a stall the
/// next tick simply runs one interval after it was observed.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct FixedTicker {
    interval: Duration,
    last: Instant,
    ticks: u64,
}

impl FixedTicker {
    pub fn new(rate_hz: u32, now: Instant) -> Self {
        FixedTicker {
            interval: Self::interval_for(rate_hz),
            last: now,
            ticks: 0,
        }
    }

    pub fn interval_for(rate_hz: u32) -> Duration {
        Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Is a tick due at `now`? Consumes the tick if so.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) < self.interval {
            return false;
        }
        self.last = now;
        self.ticks += 1;
        true
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.interval.saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Restart the cadence from `now` (used when the loop starts).
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
