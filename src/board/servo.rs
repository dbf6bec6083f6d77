//! Pickup arm servo
//!
//! The arm servo wants 40Hz, which no spare PWM slice can give next to the
//! 10kHz motor channels, so the pulse train comes from a PIO state machine.

use core::time::Duration;

use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Instance, Pio};
use embassy_rp::pio_programs::pwm::{PioPwm, PioPwmProgram};
use route_robot::system::board::{Servo, ServoPosition};
use route_robot::system::error::DeviceError;

use super::resources::{Irqs, ServoResources};

const DEFAULT_MIN_PULSE_WIDTH: u64 = 1000; // uncalibrated default, the shortest pulse sent to a servo
const DEFAULT_MAX_PULSE_WIDTH: u64 = 2000; // uncalibrated default, the longest pulse sent to a servo
const DEFAULT_MAX_DEGREE_ROTATION: u64 = 160;
const REFRESH_INTERVAL: u64 = 25_000; // 40Hz

pub struct ServoBuilder<'d, T: Instance, const SM: usize> {
    pwm: PioPwm<'d, T, SM>,
    period: Duration,
    min_pulse_width: Duration,
    max_pulse_width: Duration,
    max_degree_rotation: u64,
}

impl<'d, T: Instance, const SM: usize> ServoBuilder<'d, T, SM> {
    pub fn new(pwm: PioPwm<'d, T, SM>) -> Self {
        Self {
            pwm,
            period: Duration::from_micros(REFRESH_INTERVAL),
            min_pulse_width: Duration::from_micros(DEFAULT_MIN_PULSE_WIDTH),
            max_pulse_width: Duration::from_micros(DEFAULT_MAX_PULSE_WIDTH),
            max_degree_rotation: DEFAULT_MAX_DEGREE_ROTATION,
        }
    }

    pub fn set_min_pulse_width(mut self, duration: Duration) -> Self {
        self.min_pulse_width = duration;
        self
    }

    pub fn set_max_pulse_width(mut self, duration: Duration) -> Self {
        self.max_pulse_width = duration;
        self
    }

    pub fn set_max_degree_rotation(mut self, degree: u64) -> Self {
        self.max_degree_rotation = degree;
        self
    }

    pub fn build(mut self) -> PioServo<'d, T, SM> {
        self.pwm.set_period(self.period);
        self.pwm.start();
        PioServo {
            pwm: self.pwm,
            min_pulse_width: self.min_pulse_width,
            max_pulse_width: self.max_pulse_width,
            max_degree_rotation: self.max_degree_rotation,
        }
    }
}

pub struct PioServo<'d, T: Instance, const SM: usize> {
    pwm: PioPwm<'d, T, SM>,
    min_pulse_width: Duration,
    max_pulse_width: Duration,
    max_degree_rotation: u64,
}

impl<'d, T: Instance, const SM: usize> PioServo<'d, T, SM> {
    pub fn rotate(&mut self, degree: u8) {
        let degree = u64::from(degree).min(self.max_degree_rotation);
        let span = self.max_pulse_width.as_nanos() as u64 - self.min_pulse_width.as_nanos() as u64;
        let pulse = Duration::from_nanos(
            self.min_pulse_width.as_nanos() as u64 + degree * span / self.max_degree_rotation,
        );
        self.pwm.write(pulse.min(self.max_pulse_width));
    }
}

impl<T: Instance, const SM: usize> Servo for PioServo<'_, T, SM> {
    fn set_position(&mut self, position: ServoPosition) -> Result<(), DeviceError> {
        self.rotate(position.angle());
        Ok(())
    }
}

/// Arm servo on PIO0, 500..2500µs over 180°, parked in the down position
pub fn arm_servo(r: ServoResources) -> PioServo<'static, PIO0, 0> {
    let Pio {
        mut common, sm0, ..
    } = Pio::new(r.pio, Irqs);

    let prg = PioPwmProgram::new(&mut common);
    let pwm_pio = PioPwm::new(&mut common, sm0, r.pin, &prg);
    let mut servo = ServoBuilder::new(pwm_pio)
        .set_max_degree_rotation(180)
        .set_min_pulse_width(Duration::from_micros(500))
        .set_max_pulse_width(Duration::from_micros(2500))
        .build();
    servo.rotate(ServoPosition::Down.angle());
    servo
}
