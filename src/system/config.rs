//! Navigation tunables
//!
//! Timing and power constants live next to the code that uses them. This struct
//! only carries the values that differ between tracks.

use embassy_time::Duration;

/// Runtime navigation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavConfig {
    /// Consecutive on-line readings a 180° turn needs before it completes.
    /// Values below 1 are treated as 1.
    pub turn_around_confirmations: u8,
    /// Abort a left/right turn that has not found its line after this long.
    /// `None` keeps turning until the line is found.
    pub turn_timeout: Option<Duration>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            turn_around_confirmations: 1,
            turn_timeout: None,
        }
    }
}
