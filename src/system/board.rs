//! Hardware capabilities
//!
//! Every peripheral the robot touches is reached through one of these traits.
//! The firmware implements them on RP2350 peripherals, the tests on fakes.
//!
//! # Capabilities
//! - [`Motors`]: direction and power for the left and right wheel
//! - [`Servo`]: pickup arm position
//! - [`Indicator`]: RGB status LED
//! - [`LightSensors`]: raw readings of the left, right and rear line sensors
//! - [`DistanceLink`]: byte stream to the serial distance sensor
//! - [`RemoteLink`]: text message channel to the remote dashboard
//! - [`Clock`]: monotonic time

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::system::error::{DeviceError, LinkError};

/// Longest remote message handled, in bytes
pub const MESSAGE_LEN: usize = 32;

/// One message on the remote link
pub type Message = String<MESSAGE_LEN>;

/// Full scale of motor power and LED channel values
pub const FULL_SCALE: u16 = u16::MAX;

/// Wheel rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}

/// Pickup servo positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum ServoPosition {
    /// Arm lowered, safe position while driving and after shutdown
    Down,
    /// Arm resting after a pickup on the route
    Mid,
    /// Arm raised to lift a target
    Up,
}

impl ServoPosition {
    /// Absolute servo angle in degrees
    pub const fn angle(self) -> u8 {
        match self {
            ServoPosition::Down => 18,
            ServoPosition::Mid => 50,
            ServoPosition::Up => 147,
        }
    }
}

/// Colour of the status LED, each channel on a 0..=65535 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct Rgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

/// Raw line sensor readings on a 16-bit scale. Lower means darker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct LightReadings {
    pub left: u16,
    pub right: u16,
    pub rear: u16,
}

/// Two wheel drive. Direction must be set before power.
pub trait Motors {
    fn set_direction(&mut self, left: Direction, right: Direction) -> Result<(), DeviceError>;
    fn set_power(&mut self, left: u16, right: u16) -> Result<(), DeviceError>;
}

/// Pickup arm servo
pub trait Servo {
    fn set_position(&mut self, position: ServoPosition) -> Result<(), DeviceError>;
}

/// RGB status LED
pub trait Indicator {
    fn set_rgb(&mut self, color: Rgb) -> Result<(), DeviceError>;
}

/// The three analog line sensors
pub trait LightSensors {
    fn read(&mut self) -> Result<LightReadings, DeviceError>;

    /// Switches off the LEDs that light the track
    fn power_down(&mut self) -> Result<(), DeviceError>;
}

/// Serial link to the distance sensor
///
/// Both operations are non-blocking. Failures are transient: the reading is
/// simply lost.
pub trait DistanceLink {
    /// Write the single trigger byte that starts a measurement
    fn trigger(&mut self, byte: u8) -> Result<(), LinkError>;

    /// Copy whatever response bytes have arrived into `buf`, returning the count
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;
}

/// Bidirectional text channel to the remote dashboard
///
/// The transport itself lives outside the core. A dead link must never stall or
/// crash the tick.
pub trait RemoteLink {
    /// Whether a client is currently attached
    fn is_connected(&self) -> bool;

    /// Take the next pending inbound message, if any, without blocking
    fn receive(&mut self) -> Result<Option<Message>, LinkError>;

    /// Queue an outbound message without blocking
    fn send(&mut self, message: &str) -> Result<(), LinkError>;

    /// Drop the current client
    fn close(&mut self);
}

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Everything the navigation controller drives, bundled as one owned value
pub trait Board {
    type Motors: Motors;
    type Servo: Servo;
    type Indicator: Indicator;
    type LightSensors: LightSensors;
    type Distance: DistanceLink;
    type Remote: RemoteLink;
    type Clock: Clock;
    type Delay: DelayNs;

    fn motors(&mut self) -> &mut Self::Motors;
    fn servo(&mut self) -> &mut Self::Servo;
    fn indicator(&mut self) -> &mut Self::Indicator;
    fn light_sensors(&mut self) -> &mut Self::LightSensors;
    fn distance(&mut self) -> &mut Self::Distance;
    fn remote(&mut self) -> &mut Self::Remote;
    fn clock(&self) -> &Self::Clock;
    /// Blocking delay, only used by the calibration routine
    fn delay(&mut self) -> &mut Self::Delay;
}
