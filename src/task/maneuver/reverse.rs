//! Obstacle backoff: both wheels in reverse for a fixed time

use embassy_time::{Duration, Instant};

use super::{Outcome, Progress};
use crate::system::board::Motors;
use crate::system::drive_command::Drive;
use crate::system::error::DeviceError;
use crate::task::drive;

const REVERSE_POWER: u16 = 25_000;
const REVERSE_DURATION: Duration = Duration::from_millis(1_500);

#[derive(Debug)]
pub(super) struct Reverse {
    started: Instant,
}

impl Reverse {
    pub(super) fn start<M: Motors>(motors: &mut M, now: Instant) -> Result<Self, DeviceError> {
        drive::apply(motors, Drive::reverse(REVERSE_POWER, REVERSE_POWER))?;
        Ok(Self { started: now })
    }

    pub(super) fn update<M: Motors>(
        &mut self,
        motors: &mut M,
        progress: Progress,
    ) -> Result<Option<Outcome>, DeviceError> {
        if progress.now.saturating_duration_since(self.started) < REVERSE_DURATION {
            return Ok(None);
        }
        drive::halt(motors)?;
        Ok(Some(Outcome::Resume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::FakeMotors;
    use crate::task::maneuver::tests::at;

    #[test]
    fn backs_off_for_one_and_a_half_seconds() {
        let mut motors = FakeMotors::default();
        let mut reverse = Reverse::start(&mut motors, Instant::from_millis(0)).unwrap();
        assert_eq!(motors.power(), (25_000, 25_000));

        assert_eq!(reverse.update(&mut motors, at(1_499)), Ok(None));
        assert_eq!(motors.power(), (25_000, 25_000));
        assert_eq!(
            reverse.update(&mut motors, at(1_500)),
            Ok(Some(Outcome::Resume))
        );
        assert_eq!(motors.power(), (0, 0));
    }
}
