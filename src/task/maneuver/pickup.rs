//! Pickup: raise the arm, hold, then settle it in its rest position

use embassy_time::{Duration, Instant};

use super::{Outcome, Progress};
use crate::system::board::{Servo, ServoPosition};
use crate::system::error::DeviceError;

const HOLD: Duration = Duration::from_millis(800);

#[derive(Debug)]
pub(super) struct Pickup {
    started: Instant,
    rest: ServoPosition,
}

impl Pickup {
    pub(super) fn start<S: Servo>(
        servo: &mut S,
        rest: ServoPosition,
        now: Instant,
    ) -> Result<Self, DeviceError> {
        servo.set_position(ServoPosition::Up)?;
        Ok(Self { started: now, rest })
    }

    pub(super) fn update<S: Servo>(
        &mut self,
        servo: &mut S,
        progress: Progress,
    ) -> Result<Option<Outcome>, DeviceError> {
        if progress.now.saturating_duration_since(self.started) < HOLD {
            return Ok(None);
        }
        servo.set_position(self.rest)?;
        Ok(Some(Outcome::Resume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::FakeServo;
    use crate::task::maneuver::tests::at;

    #[test]
    fn lifts_then_rests() {
        let mut servo = FakeServo::default();
        let mut pickup = Pickup::start(&mut servo, ServoPosition::Mid, Instant::from_millis(0)).unwrap();
        assert_eq!(servo.position(), Some(ServoPosition::Up));
        assert_eq!(pickup.update(&mut servo, at(799)), Ok(None));
        assert_eq!(
            pickup.update(&mut servo, at(800)),
            Ok(Some(Outcome::Resume))
        );
        assert_eq!(servo.positions, [ServoPosition::Up, ServoPosition::Mid]);
    }
}
