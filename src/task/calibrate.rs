//! Line sensor calibration
//!
//! Drives a fixed turning pattern over the track and records the darkest
//! reading each sensor produces. The new threshold of a sensor is that minimum
//! plus a fixed offset. This is the only blocking routine: it runs to
//! completion on the injected delay.
//!
//! [`check_sensors`] is the one-shot power-up sanity read.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::system::board::{Board, Clock, LightReadings, LightSensors};
use crate::system::drive_command::Drive;
use crate::system::error::DeviceError;
use crate::system::state::Thresholds;
use crate::task::drive;

/// Total calibration drive time
const CALIBRATION_DURATION: Duration = Duration::from_millis(12_400);
/// Time between samples
const SAMPLE_PERIOD_MS: u32 = 100;
/// Samples are only used when all three readings are above this
const NOISE_FLOOR: u16 = 10_000;
/// Added to the observed minimum to get the threshold
const THRESHOLD_OFFSET: u32 = 4_000;
/// A sensor reading below this at power-up is most likely dead or unlit
const HEALTHY_FLOOR: u16 = 7_000;

/// Left wheel only, the robot sweeps its sensors across the line
const CALIBRATION_DRIVE: Drive = Drive::forward(37_000, 0);

/// Running minima per sensor. Kept across runs, they only ever decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Minima {
    left: Option<u16>,
    right: Option<u16>,
    rear: Option<u16>,
}

impl Minima {
    pub const fn new() -> Self {
        Self {
            left: None,
            right: None,
            rear: None,
        }
    }

    /// Records a sample if every reading clears the noise floor
    pub fn observe(&mut self, readings: LightReadings) -> bool {
        let valid = readings.left > NOISE_FLOOR
            && readings.right > NOISE_FLOOR
            && readings.rear > NOISE_FLOOR;
        if valid {
            lower(&mut self.left, readings.left);
            lower(&mut self.right, readings.right);
            lower(&mut self.rear, readings.rear);
        }
        valid
    }

    /// Thresholds from the minima; unobserved sensors keep `previous`
    pub fn thresholds(&self, previous: Thresholds) -> Thresholds {
        let threshold = |minimum: Option<u16>, previous: u32| {
            minimum.map_or(previous, |minimum| u32::from(minimum) + THRESHOLD_OFFSET)
        };
        Thresholds {
            left: threshold(self.left, previous.left),
            right: threshold(self.right, previous.right),
            rear: threshold(self.rear, previous.rear),
        }
    }
}

fn lower(minimum: &mut Option<u16>, reading: u16) {
    *minimum = Some(minimum.map_or(reading, |current| current.min(reading)));
}

/// One reading of every sensor at power-up. Suspiciously dark sensors are
/// reported, the robot runs either way.
pub fn check_sensors<L: LightSensors>(sensors: &mut L) -> Result<bool, DeviceError> {
    let readings = sensors.read()?;
    let mut healthy = true;
    for (name, value) in [
        ("left", readings.left),
        ("right", readings.right),
        ("rear", readings.rear),
    ] {
        if value < HEALTHY_FLOOR {
            warn!("{} light sensor reads very low: {}", name, value);
            healthy = false;
        }
    }
    Ok(healthy)
}

/// Runs the calibration drive and returns the new thresholds
///
/// The turning pattern is written again before every sample. The motors are
/// stopped when the routine returns successfully.
pub fn calibrate<B: Board>(
    board: &mut B,
    minima: &mut Minima,
    previous: Thresholds,
) -> Result<Thresholds, DeviceError> {
    info!("calibration started");
    let started = board.clock().now();
    let mut samples = 0u32;
    let mut accepted = 0u32;
    while board.clock().now().saturating_duration_since(started) < CALIBRATION_DURATION {
        drive::apply(board.motors(), CALIBRATION_DRIVE)?;
        let readings = board.light_sensors().read()?;
        samples += 1;
        if minima.observe(readings) {
            accepted += 1;
        }
        board.delay().delay_ms(SAMPLE_PERIOD_MS);
    }

    drive::halt(board.motors())?;
    let thresholds = minima.thresholds(previous);
    info!(
        "calibration done, {}/{} samples used, thresholds {} {} {}",
        accepted,
        samples,
        thresholds.left,
        thresholds.right,
        thresholds.rear
    );
    Ok(thresholds)
}
