//! System Indicator Module
//!
//! The status LED pattern is never stored: it is derived every tick from the
//! navigation mode, the active maneuver, the last manual command and the
//! heading-to-finish flag, then rendered against the animation clock.
//!
//! # Precedence
//! 1. Heading to finish: solid blue
//! 2. Pickup running: orange blink
//! 3. Reversing or error: red blink
//! 4. Manual: purple, bluer after a backward jog
//! 5. Driving: white/green breathing
//! 6. Otherwise off

use core::f32::consts::PI;

use crate::system::board::{Rgb, FULL_SCALE};
use crate::system::remote_command::ManualCommand;
use crate::system::state::NavMode;
use crate::task::maneuver::ManeuverKind;

/// Everything the pattern depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorInputs {
    pub mode: NavMode,
    pub active: Option<ManeuverKind>,
    pub last_manual: Option<ManualCommand>,
    pub heading_to_finish: bool,
}

/// Status LED patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Pattern {
    Off,
    /// Solid blue: no pickups left, driving to the finish
    Finish,
    /// Orange, on for one second and off for one
    PickupBlink,
    /// Red, on for one second and off for one
    ErrorBlink,
    /// Solid purple; blue channel raised after a backward jog
    Manual { backward: bool },
    /// White fading into green and back once per second
    Driving,
}

impl Pattern {
    /// Derives the pattern for the current inputs
    pub fn select(inputs: IndicatorInputs) -> Self {
        if inputs.heading_to_finish {
            Pattern::Finish
        } else if inputs.active == Some(ManeuverKind::Pickup) {
            Pattern::PickupBlink
        } else if inputs.active == Some(ManeuverKind::Reverse) || inputs.mode == NavMode::Error {
            Pattern::ErrorBlink
        } else if inputs.mode == NavMode::Manual {
            Pattern::Manual {
                backward: inputs.last_manual == Some(ManualCommand::Backward),
            }
        } else if inputs.mode == NavMode::Driving {
            Pattern::Driving
        } else {
            Pattern::Off
        }
    }

    /// Colour of the pattern at animation time `t` (seconds)
    pub fn color(self, t: f32) -> Rgb {
        let blink_on = t % 2.0 < 1.0;
        match self {
            Pattern::Off => Rgb::OFF,
            Pattern::Finish => Rgb::new(0, 0, FULL_SCALE),
            Pattern::PickupBlink if blink_on => Rgb::new(FULL_SCALE, 8_000, 0),
            Pattern::ErrorBlink if blink_on => Rgb::new(FULL_SCALE, 0, 0),
            Pattern::PickupBlink | Pattern::ErrorBlink => Rgb::OFF,
            Pattern::Manual { backward } => {
                Rgb::new(40_000, 0, if backward { FULL_SCALE } else { 40_000 })
            }
            Pattern::Driving => {
                let level = channel(breathe(t) * f32::from(FULL_SCALE));
                Rgb::new(level, FULL_SCALE, level)
            }
        }
    }
}

/// Smooth 0..=1 wave with a one second period
fn breathe(t: f32) -> f32 {
    0.5 + 0.5 * libm::sinf(2.0 * PI * t)
}

/// Clamps a computed level into the LED channel range
fn channel(value: f32) -> u16 {
    value.clamp(0.0, f32::from(FULL_SCALE)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(mode: NavMode) -> IndicatorInputs {
        IndicatorInputs {
            mode,
            active: None,
            last_manual: None,
            heading_to_finish: false,
        }
    }

    #[test]
    fn finish_overrides_everything() {
        let pattern = Pattern::select(IndicatorInputs {
            active: Some(ManeuverKind::Pickup),
            heading_to_finish: true,
            ..inputs(NavMode::Manual)
        });
        assert_eq!(pattern, Pattern::Finish);
        assert_eq!(pattern.color(0.3), Rgb::new(0, 0, 65_535));
    }

    #[test]
    fn reverse_shows_error_blink_while_driving() {
        let pattern = Pattern::select(IndicatorInputs {
            active: Some(ManeuverKind::Reverse),
            ..inputs(NavMode::Driving)
        });
        assert_eq!(pattern, Pattern::ErrorBlink);
        assert_eq!(pattern.color(0.5), Rgb::new(65_535, 0, 0));
        assert_eq!(pattern.color(1.5), Rgb::OFF);
    }

    #[test]
    fn manual_colour_follows_last_command() {
        let forward = Pattern::select(IndicatorInputs {
            last_manual: Some(ManualCommand::Forward),
            ..inputs(NavMode::Manual)
        });
        let backward = Pattern::select(IndicatorInputs {
            last_manual: Some(ManualCommand::Backward),
            ..inputs(NavMode::Manual)
        });
        assert_eq!(forward.color(0.0), Rgb::new(40_000, 0, 40_000));
        assert_eq!(backward.color(0.0), Rgb::new(40_000, 0, 65_535));
    }

    #[test]
    fn driving_breathes_between_white_and_green() {
        let pattern = Pattern::select(inputs(NavMode::Driving));
        assert_eq!(pattern, Pattern::Driving);
        // sin peaks at t = 0.25 and bottoms out at t = 0.75
        let white = pattern.color(0.25);
        let green = pattern.color(0.75);
        assert!(white.red > 65_000 && white.blue > 65_000);
        assert!(green.red < 500 && green.blue < 500);
        assert_eq!(green.green, 65_535);
    }

    #[test]
    fn stopped_and_calibrating_are_dark() {
        assert_eq!(Pattern::select(inputs(NavMode::Stopped)), Pattern::Off);
        assert_eq!(Pattern::select(inputs(NavMode::Calibrating)), Pattern::Off);
    }
}
