//! Drive Module
//!
//! Turns [`Drive`] commands into motor calls and picks the line following
//! correction. Direction is always written before power, so a wheel never
//! spins up in the previous direction.

use crate::system::board::Motors;
use crate::system::drive_command::Drive;
use crate::system::error::DeviceError;
use crate::system::state::LineFlags;

/// Cruise power for both wheels, used on `start` and when centred on the line
pub const CRUISE_POWER: u16 = 60_000;

/// Outer and inner wheel power while steering back onto the line
const STEER_OUTER_POWER: u16 = 65_000;
const STEER_INNER_POWER: u16 = 35_000;

/// Applies a complete drive command
pub fn apply<M: Motors>(motors: &mut M, drive: Drive) -> Result<(), DeviceError> {
    motors.set_direction(drive.left, drive.right)?;
    motors.set_power(drive.left_power, drive.right_power)
}

/// Zeroes the power of both wheels, keeping their direction
pub fn halt<M: Motors>(motors: &mut M) -> Result<(), DeviceError> {
    motors.set_power(0, 0)
}

/// Line following correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Correction {
    Straight,
    SteerLeft,
    SteerRight,
}

impl Correction {
    /// Both side sensors on the line drive straight. A single sensor on the
    /// line steers away from that side. With neither on the line the robot
    /// searches by steering right.
    pub fn from_line(line: LineFlags) -> Self {
        match (line.left, line.right) {
            (true, true) => Correction::Straight,
            (false, true) => Correction::SteerLeft,
            (true, false) | (false, false) => Correction::SteerRight,
        }
    }

    pub fn drive(self) -> Drive {
        match self {
            Correction::Straight => Drive::forward(CRUISE_POWER, CRUISE_POWER),
            Correction::SteerLeft => Drive::forward(STEER_INNER_POWER, STEER_OUTER_POWER),
            Correction::SteerRight => Drive::forward(STEER_OUTER_POWER, STEER_INNER_POWER),
        }
    }
}
