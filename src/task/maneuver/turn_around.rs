//! 180° turn
//!
//! Spins in place counter-clockwise. After the spin-up the turn slows down
//! and counts consecutive sensor samples with either side on the line. A hard
//! timeout gives up if the line is never found.

use embassy_time::{Duration, Instant};

use super::{Outcome, Progress};
use crate::system::board::Motors;
use crate::system::drive_command::Drive;
use crate::system::error::DeviceError;
use crate::task::drive;

const SPIN_UP: Duration = Duration::from_millis(2_000);
const TIMEOUT: Duration = Duration::from_millis(10_000);
const SPIN_UP_POWER: u16 = 50_000;
const SEEK_POWER: u16 = 20_000;

#[derive(Debug)]
pub(super) struct TurnAround {
    started: Instant,
    required: u8,
    confirmed: u8,
    seeking: bool,
}

impl TurnAround {
    pub(super) fn start<M: Motors>(
        motors: &mut M,
        confirmations: u8,
        now: Instant,
    ) -> Result<Self, DeviceError> {
        drive::apply(motors, Drive::spin_left(SPIN_UP_POWER, SPIN_UP_POWER))?;
        Ok(Self {
            started: now,
            required: confirmations.max(1),
            confirmed: 0,
            seeking: false,
        })
    }

    pub(super) fn update<M: Motors>(
        &mut self,
        motors: &mut M,
        progress: Progress,
    ) -> Result<Option<Outcome>, DeviceError> {
        let elapsed = progress.now.saturating_duration_since(self.started);

        if elapsed >= TIMEOUT {
            warn!("turn around did not find the line, giving up");
            drive::halt(motors)?;
            return Ok(Some(Outcome::TimedOut));
        }

        if !self.seeking {
            if elapsed < SPIN_UP {
                return Ok(None);
            }
            motors.set_power(SEEK_POWER, SEEK_POWER)?;
            self.seeking = true;
        }

        if progress.sampled {
            if progress.line.either_side() {
                self.confirmed = self.confirmed.saturating_add(1);
                debug!("turn around confirmation {}/{}", self.confirmed, self.required);
            } else {
                self.confirmed = 0;
            }
        }

        if self.confirmed >= self.required {
            drive::halt(motors)?;
            return Ok(Some(Outcome::Turned));
        }
        Ok(None)
    }
}
