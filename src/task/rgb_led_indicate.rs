//! RGB LED Indicator Module
//!
//! Re-renders the status LED on every tick. The pattern itself is derived in
//! [`crate::system::indicator`]; this module owns the animation clock.

use crate::system::board::Indicator;
use crate::system::error::DeviceError;
use crate::system::indicator::{IndicatorInputs, Pattern};

/// Animation time added per tick
const ANIMATION_STEP: f32 = 0.05;

/// Common period of every animated pattern, the clock wraps here
const ANIMATION_PERIOD: f32 = 2.0;

#[derive(Debug, Default)]
pub struct RgbLedIndicate {
    t: f32,
}

impl RgbLedIndicate {
    pub const fn new() -> Self {
        Self { t: 0.0 }
    }

    /// Advances the animation clock and writes the current colour
    pub fn render<I: Indicator>(
        &mut self,
        indicator: &mut I,
        inputs: IndicatorInputs,
    ) -> Result<Pattern, DeviceError> {
        self.t = (self.t + ANIMATION_STEP) % ANIMATION_PERIOD;
        let pattern = Pattern::select(inputs);
        indicator.set_rgb(pattern.color(self.t))?;
        Ok(pattern)
    }
}
