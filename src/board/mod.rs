//! RP2350 implementation of the robot's capabilities
//!
//! Each adapter owns its resource group. The two serial devices run in their
//! own tasks and are reached through non-blocking handles.

pub mod distance_uart;
pub mod light_sensors;
pub mod motors;
pub mod remote_uart;
pub mod resources;
pub mod rgb_led;
pub mod servo;

use embassy_rp::peripherals::PIO0;
use embassy_time::{Delay, Instant};
use route_robot::system::board::{Board, Clock};
use route_robot::system::error::DeviceError;

use self::distance_uart::UartDistance;
use self::light_sensors::AdcLightSensors;
use self::motors::BridgeMotors;
use self::remote_uart::UartRemote;
use self::resources::{LightSensorResources, MotorDriverResources, RgbLedResources, ServoResources};
use self::rgb_led::RgbLed;
use self::servo::{arm_servo, PioServo};

/// Embassy time driver
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct RobotBoard {
    motors: BridgeMotors,
    servo: PioServo<'static, PIO0, 0>,
    indicator: RgbLed,
    light: AdcLightSensors,
    distance: UartDistance,
    remote: UartRemote,
    clock: SystemClock,
    delay: Delay,
}

impl RobotBoard {
    pub fn new(
        motor_driver: MotorDriverResources,
        servo: ServoResources,
        rgb_led: RgbLedResources,
        light_sensors: LightSensorResources,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            motors: BridgeMotors::new(motor_driver)?,
            servo: arm_servo(servo),
            indicator: RgbLed::new(rgb_led)?,
            light: AdcLightSensors::new(light_sensors),
            distance: UartDistance,
            remote: UartRemote,
            clock: SystemClock,
            delay: Delay,
        })
    }
}

impl Board for RobotBoard {
    type Motors = BridgeMotors;
    type Servo = PioServo<'static, PIO0, 0>;
    type Indicator = RgbLed;
    type LightSensors = AdcLightSensors;
    type Distance = UartDistance;
    type Remote = UartRemote;
    type Clock = SystemClock;
    type Delay = Delay;

    fn motors(&mut self) -> &mut Self::Motors {
        &mut self.motors
    }

    fn servo(&mut self) -> &mut Self::Servo {
        &mut self.servo
    }

    fn indicator(&mut self) -> &mut Self::Indicator {
        &mut self.indicator
    }

    fn light_sensors(&mut self) -> &mut Self::LightSensors {
        &mut self.light
    }

    fn distance(&mut self) -> &mut Self::Distance {
        &mut self.distance
    }

    fn remote(&mut self) -> &mut Self::Remote {
        &mut self.remote
    }

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn delay(&mut self) -> &mut Self::Delay {
        &mut self.delay
    }
}
