//! Distance sensor handling
//!
//! The serial distance sensor answers a single trigger byte with a two byte
//! big-endian reading in millimetres. The request is polled, never awaited:
//! the tick triggers a measurement, comes back after the settle time and takes
//! whatever has arrived.
//!
//! # Protocol
//! - Trigger: write `0x55`
//! - Settle: 100ms
//! - Response: `[high, low]`, distance in cm is `(high * 256 + low) / 10`
//!
//! # Error Handling
//! - A failed trigger or a response that is not exactly two bytes leaves no reading
//! - The request is complete either way, the next one starts fresh

use embassy_time::{Duration, Instant};

use crate::system::board::DistanceLink;

/// Byte that starts a measurement
pub const TRIGGER: u8 = 0x55;

/// Time the sensor needs before its response can be read
const SETTLE: Duration = Duration::from_millis(100);

/// Anything closer than this is an obstacle
pub const OBSTACLE_DISTANCE_CM: f32 = 10.0;

/// Decodes a sensor response into centimetres
pub fn decode(response: &[u8]) -> Option<f32> {
    match response {
        [high, low] => Some(f32::from(u16::from_be_bytes([*high, *low])) / 10.0),
        _ => None,
    }
}

/// Poll-driven distance measurement with at most one request in flight
#[derive(Debug, Default)]
pub struct DistanceMeasure {
    last: Option<f32>,
    requested: Option<Instant>,
}

impl DistanceMeasure {
    pub const fn new() -> Self {
        Self {
            last: None,
            requested: None,
        }
    }

    /// Triggers a measurement unless one is already in flight
    pub fn ensure_requested<L: DistanceLink>(&mut self, link: &mut L, now: Instant) {
        if self.requested.is_some() {
            return;
        }
        match link.trigger(TRIGGER) {
            Ok(()) => self.requested = Some(now),
            Err(err) => {
                debug!("distance trigger failed: {:?}", err);
                self.last = None;
            }
        }
    }

    /// Collects the response once the settle time has passed
    pub fn update<L: DistanceLink>(&mut self, link: &mut L, now: Instant) {
        let Some(requested) = self.requested else {
            return;
        };
        if now.saturating_duration_since(requested) < SETTLE {
            return;
        }

        let mut response = [0u8; 2];
        self.last = match link.read(&mut response) {
            Ok(len) => decode(&response[..len]),
            Err(err) => {
                debug!("distance read failed: {:?}", err);
                None
            }
        };
        self.requested = None;
    }

    /// Last completed reading in centimetres
    pub fn last(&self) -> Option<f32> {
        self.last
    }

    pub fn in_flight(&self) -> bool {
        self.requested.is_some()
    }

    /// The last reading is closer than [`OBSTACLE_DISTANCE_CM`]
    pub fn obstacle(&self) -> bool {
        self.last.is_some_and(|cm| cm < OBSTACLE_DISTANCE_CM)
    }
}
