//! Short fixed-time motor bursts
//!
//! Crossing straight over an intersection and manual jogs are both a drive
//! command held for a fixed time. A crossing hands back to line following
//! with the wheels still turning; a jog stops the wheels.

use embassy_time::{Duration, Instant};

use super::{ManeuverKind, Outcome, Progress};
use crate::system::board::Motors;
use crate::system::drive_command::Drive;
use crate::system::error::DeviceError;
use crate::task::drive;

const CROSS_POWER: u16 = 45_000;
const CROSS_DURATION: Duration = Duration::from_millis(300);
/// Stronger and longer after a reverse, the robot starts further back
const CROSS_AFTER_REVERSE_POWER: u16 = 55_000;
const CROSS_AFTER_REVERSE_DURATION: Duration = Duration::from_millis(500);

const JOG_DURATION: Duration = Duration::from_millis(100);

/// Manual jog directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Jog {
    Forward,
    Backward,
    Left,
    Right,
}

impl Jog {
    fn drive(self) -> Drive {
        match self {
            Jog::Forward => Drive::forward(50_000, 42_000),
            Jog::Backward => Drive::reverse(50_000, 42_000),
            Jog::Left => Drive::spin_left(30_000, 30_000),
            Jog::Right => Drive::spin_right(30_000, 30_000),
        }
    }
}

#[derive(Debug)]
pub(super) struct Burst {
    kind: ManeuverKind,
    started: Instant,
    duration: Duration,
}

impl Burst {
    pub(super) fn cross<M: Motors>(
        motors: &mut M,
        after_reverse: bool,
        now: Instant,
    ) -> Result<Self, DeviceError> {
        let (power, duration) = if after_reverse {
            (CROSS_AFTER_REVERSE_POWER, CROSS_AFTER_REVERSE_DURATION)
        } else {
            (CROSS_POWER, CROSS_DURATION)
        };
        drive::apply(motors, Drive::forward(power, power))?;
        Ok(Self {
            kind: ManeuverKind::Cross,
            started: now,
            duration,
        })
    }

    pub(super) fn jog<M: Motors>(motors: &mut M, jog: Jog, now: Instant) -> Result<Self, DeviceError> {
        drive::apply(motors, jog.drive())?;
        Ok(Self {
            kind: ManeuverKind::Jog,
            started: now,
            duration: JOG_DURATION,
        })
    }

    pub(super) fn kind(&self) -> ManeuverKind {
        self.kind
    }

    pub(super) fn update<M: Motors>(
        &mut self,
        motors: &mut M,
        progress: Progress,
    ) -> Result<Option<Outcome>, DeviceError> {
        if progress.now.saturating_duration_since(self.started) < self.duration {
            return Ok(None);
        }
        match self.kind {
            ManeuverKind::Jog => {
                drive::halt(motors)?;
                Ok(Some(Outcome::Halted))
            }
            _ => Ok(Some(Outcome::Resume)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::board::Direction;
    use crate::system::mock::FakeMotors;
    use crate::task::maneuver::tests::at;

    #[test]
    fn cross_keeps_wheels_turning() {
        let mut motors = FakeMotors::default();
        let mut burst = Burst::cross(&mut motors, false, Instant::from_millis(0)).unwrap();
        assert_eq!(motors.power(), (45_000, 45_000));
        assert_eq!(burst.update(&mut motors, at(299)), Ok(None));
        assert_eq!(burst.update(&mut motors, at(300)), Ok(Some(Outcome::Resume)));
        assert_eq!(motors.power(), (45_000, 45_000));
    }

    #[test]
    fn cross_after_reverse_is_stronger_and_longer() {
        let mut motors = FakeMotors::default();
        let mut burst = Burst::cross(&mut motors, true, Instant::from_millis(0)).unwrap();
        assert_eq!(motors.power(), (55_000, 55_000));
        assert_eq!(burst.update(&mut motors, at(300)), Ok(None));
        assert_eq!(burst.update(&mut motors, at(500)), Ok(Some(Outcome::Resume)));
    }

    #[test]
    fn jog_stops_after_a_tenth_of_a_second() {
        let mut motors = FakeMotors::default();
        let mut burst = Burst::jog(&mut motors, Jog::Backward, Instant::from_millis(0)).unwrap();
        assert_eq!(
            motors.direction(),
            Some((Direction::Reverse, Direction::Reverse))
        );
        assert_eq!(motors.power(), (50_000, 42_000));
        assert_eq!(burst.update(&mut motors, at(100)), Ok(Some(Outcome::Halted)));
        assert_eq!(motors.power(), (0, 0));
    }
}
