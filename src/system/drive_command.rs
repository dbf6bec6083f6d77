//! Drive Command Module
//!
//! A [`Drive`] is one complete motor command: a direction and a power for each
//! wheel. Power is a PWM duty on a 0..=65535 scale.

use crate::system::board::Direction;

/// Direction and power for both wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct Drive {
    pub left: Direction,
    pub right: Direction,
    pub left_power: u16,
    pub right_power: u16,
}

impl Drive {
    /// Both wheels forward
    pub const fn forward(left_power: u16, right_power: u16) -> Self {
        Self {
            left: Direction::Forward,
            right: Direction::Forward,
            left_power,
            right_power,
        }
    }

    /// Both wheels in reverse
    pub const fn reverse(left_power: u16, right_power: u16) -> Self {
        Self {
            left: Direction::Reverse,
            right: Direction::Reverse,
            left_power,
            right_power,
        }
    }

    /// Spin counter-clockwise: left wheel back, right wheel forward
    pub const fn spin_left(left_power: u16, right_power: u16) -> Self {
        Self {
            left: Direction::Reverse,
            right: Direction::Forward,
            left_power,
            right_power,
        }
    }

    /// Spin clockwise: left wheel forward, right wheel back
    pub const fn spin_right(left_power: u16, right_power: u16) -> Self {
        Self {
            left: Direction::Forward,
            right: Direction::Reverse,
            left_power,
            right_power,
        }
    }
}
