//! TB6612FNG motor bridge
//!
//! Power arrives on the navigation scale (0..=65535) and is mapped onto the
//! driver's percent steps. Zero power coasts the wheel.

use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{self, Pwm};
use route_robot::system::board::{Direction, Motors, FULL_SCALE};
use route_robot::system::error::DeviceError;
use tb6612fng::{DriveCommand, Motor, Tb6612fng};

use super::resources::MotorDriverResources;

/// PWM frequency, cheap DC motors run best at low frequencies
const PWM_FREQ_HZ: u32 = 10_000;

type Bridge = Tb6612fng<
    Motor<Output<'static>, Output<'static>, Pwm<'static>>,
    Motor<Output<'static>, Output<'static>, Pwm<'static>>,
    Output<'static>,
>;

pub struct BridgeMotors {
    bridge: Bridge,
    left: Direction,
    right: Direction,
}

impl BridgeMotors {
    pub fn new(r: MotorDriverResources) -> Result<Self, DeviceError> {
        let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();
        // Minimum divider that keeps the period within 16 bits
        let divider = ((clock_freq_hz / PWM_FREQ_HZ) / 65535 + 1) as u8;
        let period = (clock_freq_hz / (PWM_FREQ_HZ * divider as u32)) as u16 - 1;

        let mut pwm_config = pwm::Config::default();
        pwm_config.divider = divider.into();
        pwm_config.top = period;

        let stby = Output::new(r.standby_pin, Level::Low);

        let left_fwd = Output::new(r.left_forward_pin, Level::Low);
        let left_bckw = Output::new(r.left_backward_pin, Level::Low);
        let left_pwm = Pwm::new_output_a(r.left_slice, r.left_pwm_pin, pwm_config.clone());
        let left_motor =
            Motor::new(left_fwd, left_bckw, left_pwm).map_err(|_| DeviceError::Motor)?;

        let right_fwd = Output::new(r.right_forward_pin, Level::Low);
        let right_bckw = Output::new(r.right_backward_pin, Level::Low);
        let right_pwm = Pwm::new_output_b(r.right_slice, r.right_pwm_pin, pwm_config);
        let right_motor =
            Motor::new(right_fwd, right_bckw, right_pwm).map_err(|_| DeviceError::Motor)?;

        let mut bridge =
            Tb6612fng::new(left_motor, right_motor, stby).map_err(|_| DeviceError::Motor)?;
        bridge.disable_standby().map_err(|_| DeviceError::Motor)?;

        Ok(Self {
            bridge,
            left: Direction::Forward,
            right: Direction::Forward,
        })
    }
}

/// Maps a navigation power value onto the driver's percent range
fn percent(power: u16) -> u8 {
    (u32::from(power) * 100 / u32::from(FULL_SCALE)) as u8
}

fn command(direction: Direction, power: u16) -> DriveCommand {
    match (direction, percent(power)) {
        (_, 0) => DriveCommand::Stop,
        (Direction::Forward, speed) => DriveCommand::Forward(speed),
        (Direction::Reverse, speed) => DriveCommand::Backward(speed),
    }
}

impl Motors for BridgeMotors {
    fn set_direction(&mut self, left: Direction, right: Direction) -> Result<(), DeviceError> {
        self.left = left;
        self.right = right;
        Ok(())
    }

    fn set_power(&mut self, left: u16, right: u16) -> Result<(), DeviceError> {
        self.bridge
            .motor_a
            .drive(command(self.left, left))
            .map_err(|_| DeviceError::Motor)?;
        self.bridge
            .motor_b
            .drive(command(self.right, right))
            .map_err(|_| DeviceError::Motor)
    }
}
