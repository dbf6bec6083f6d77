//! Interval scheduling for the navigation tick
//!
//! The tick never sleeps. Periodic work is gated by a stored "next allowed"
//! instant that is compared against the clock on every pass.

use embassy_time::{Duration, Instant};

/// A periodic gate, due immediately after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub const fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Returns true at most once per period and schedules the next slot
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now < next => false,
            _ => {
                self.next = Some(now + self.period);
                true
            }
        }
    }

    /// Pushes the next slot a full period away from `now`
    pub fn reset(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }
}
