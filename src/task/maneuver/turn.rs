//! Directional turn onto a crossing line
//!
//! The turn spins up hard for a fixed time to leave the current line, then
//! slows down and waits for either side sensor to find the new one.

use embassy_time::{Duration, Instant};

use super::{ManeuverKind, Outcome, Progress};
use crate::system::board::Motors;
use crate::system::drive_command::Drive;
use crate::system::error::DeviceError;
use crate::task::drive;

const SPIN_UP: Duration = Duration::from_millis(800);

/// Turn direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn spin_up(self) -> Drive {
        match self {
            Side::Left => Drive::spin_left(5_000, 58_000),
            Side::Right => Drive::spin_right(58_000, 5_000),
        }
    }

    /// (left, right) power while searching for the line
    fn seek_power(self) -> (u16, u16) {
        match self {
            Side::Left => (30_000, 5_000),
            Side::Right => (5_000, 30_000),
        }
    }
}

#[derive(Debug)]
pub(super) struct Turn {
    side: Side,
    started: Instant,
    timeout: Option<Duration>,
    seeking: bool,
}

impl Turn {
    pub(super) fn start<M: Motors>(
        motors: &mut M,
        side: Side,
        timeout: Option<Duration>,
        now: Instant,
    ) -> Result<Self, DeviceError> {
        drive::apply(motors, side.spin_up())?;
        Ok(Self {
            side,
            started: now,
            timeout,
            seeking: false,
        })
    }

    pub(super) fn kind(&self) -> ManeuverKind {
        match self.side {
            Side::Left => ManeuverKind::TurnLeft,
            Side::Right => ManeuverKind::TurnRight,
        }
    }

    pub(super) fn update<M: Motors>(
        &mut self,
        motors: &mut M,
        progress: Progress,
    ) -> Result<Option<Outcome>, DeviceError> {
        let elapsed = progress.now.saturating_duration_since(self.started);

        if self.timeout.is_some_and(|timeout| elapsed >= timeout) {
            warn!("turn {:?} did not find the line in time", self.side);
            drive::halt(motors)?;
            return Ok(Some(Outcome::TimedOut));
        }

        if !self.seeking {
            if elapsed < SPIN_UP {
                return Ok(None);
            }
            let (left, right) = self.side.seek_power();
            motors.set_power(left, right)?;
            self.seeking = true;
        }

        if progress.line.either_side() {
            drive::halt(motors)?;
            return Ok(Some(Outcome::Turned));
        }
        Ok(None)
    }
}
