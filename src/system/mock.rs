//! Fake board for host tests
//!
//! Records every actuator command, plays back scripted sensor readings,
//! distance responses and remote messages, and shares one fake clock between
//! [`FakeClock`] and [`FakeDelay`] so blocking delays advance time.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;

use crate::system::board::{
    Board, Clock, Direction, DistanceLink, Indicator, LightReadings, LightSensors, Message,
    Motors, RemoteLink, Rgb, Servo, ServoPosition,
};
use crate::system::error::{DeviceError, LinkError};

/// Reading well below every factory threshold
pub const DARK: u16 = 5_000;
/// Reading well above every factory threshold
pub const BRIGHT: u16 = 60_000;

/// Manually advanced monotonic clock
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    micros: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn advance(&self, by: Duration) {
        self.micros.set(self.micros.get() + by.as_micros());
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.micros.get())
    }
}

/// Blocking delay that only moves the fake clock
#[derive(Debug, Clone)]
pub struct FakeDelay {
    clock: FakeClock,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock
            .advance(Duration::from_micros(u64::from(ns).div_ceil(1_000)));
    }
}

/// One call on the motor driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCall {
    Direction(Direction, Direction),
    Power(u16, u16),
}

#[derive(Debug, Default)]
pub struct FakeMotors {
    pub calls: Vec<MotorCall>,
    pub fail: bool,
}

impl FakeMotors {
    /// Last commanded power pair, zero if nothing was commanded
    pub fn power(&self) -> (u16, u16) {
        self.calls
            .iter()
            .rev()
            .find_map(|call| match call {
                MotorCall::Power(left, right) => Some((*left, *right)),
                _ => None,
            })
            .unwrap_or((0, 0))
    }

    /// Last commanded direction pair
    pub fn direction(&self) -> Option<(Direction, Direction)> {
        self.calls.iter().rev().find_map(|call| match call {
            MotorCall::Direction(left, right) => Some((*left, *right)),
            _ => None,
        })
    }
}

impl Motors for FakeMotors {
    fn set_direction(&mut self, left: Direction, right: Direction) -> Result<(), DeviceError> {
        if self.fail {
            return Err(DeviceError::Motor);
        }
        self.calls.push(MotorCall::Direction(left, right));
        Ok(())
    }

    fn set_power(&mut self, left: u16, right: u16) -> Result<(), DeviceError> {
        if self.fail {
            return Err(DeviceError::Motor);
        }
        self.calls.push(MotorCall::Power(left, right));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeServo {
    pub positions: Vec<ServoPosition>,
}

impl FakeServo {
    pub fn position(&self) -> Option<ServoPosition> {
        self.positions.last().copied()
    }
}

impl Servo for FakeServo {
    fn set_position(&mut self, position: ServoPosition) -> Result<(), DeviceError> {
        self.positions.push(position);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeIndicator {
    pub color: Rgb,
    pub writes: usize,
}

impl Indicator for FakeIndicator {
    fn set_rgb(&mut self, color: Rgb) -> Result<(), DeviceError> {
        self.color = color;
        self.writes += 1;
        Ok(())
    }
}

/// Returns scripted readings first, then the steady `readings`
#[derive(Debug)]
pub struct FakeLightSensors {
    pub readings: LightReadings,
    pub script: VecDeque<LightReadings>,
    pub reads: usize,
    pub lit: bool,
}

impl FakeLightSensors {
    pub fn set(&mut self, left: u16, right: u16, rear: u16) {
        self.readings = LightReadings { left, right, rear };
    }
}

impl LightSensors for FakeLightSensors {
    fn read(&mut self) -> Result<LightReadings, DeviceError> {
        self.reads += 1;
        Ok(self.script.pop_front().unwrap_or(self.readings))
    }

    fn power_down(&mut self) -> Result<(), DeviceError> {
        self.lit = false;
        Ok(())
    }
}

/// Answers each trigger with the next scripted response, or `steady` when the
/// script is empty
#[derive(Debug, Default)]
pub struct FakeDistance {
    pub triggers: Vec<u8>,
    pub responses: VecDeque<Vec<u8>>,
    pub steady: Option<Vec<u8>>,
    pending: Option<Vec<u8>>,
}

impl FakeDistance {
    /// Queues a response encoding `tenths` of a centimetre
    pub fn respond_tenths(&mut self, tenths: u16) {
        self.responses.push_back(tenths.to_be_bytes().to_vec());
    }
}

impl DistanceLink for FakeDistance {
    fn trigger(&mut self, byte: u8) -> Result<(), LinkError> {
        self.triggers.push(byte);
        self.pending = self.responses.pop_front().or_else(|| self.steady.clone());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let Some(response) = self.pending.take() else {
            return Ok(0);
        };
        let len = response.len().min(buf.len());
        buf[..len].copy_from_slice(&response[..len]);
        Ok(len)
    }
}

#[derive(Debug, Default)]
pub struct FakeRemote {
    pub connected: bool,
    pub inbox: VecDeque<String>,
    pub outbox: Vec<String>,
    pub fail_send: bool,
    pub closes: usize,
}

impl FakeRemote {
    pub fn push(&mut self, message: &str) {
        self.inbox.push_back(message.to_string());
    }
}

impl RemoteLink for FakeRemote {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn receive(&mut self) -> Result<Option<Message>, LinkError> {
        if !self.connected {
            return Err(LinkError::Disconnected);
        }
        Ok(self.inbox.pop_front().map(|text| {
            let mut message = Message::new();
            let _ = message.push_str(&text);
            message
        }))
    }

    fn send(&mut self, message: &str) -> Result<(), LinkError> {
        if !self.connected {
            return Err(LinkError::Disconnected);
        }
        if self.fail_send {
            return Err(LinkError::SendFailed);
        }
        self.outbox.push(message.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.connected = false;
        self.closes += 1;
    }
}

#[derive(Debug)]
pub struct FakeBoard {
    pub motors: FakeMotors,
    pub servo: FakeServo,
    pub indicator: FakeIndicator,
    pub light: FakeLightSensors,
    pub distance: FakeDistance,
    pub remote: FakeRemote,
    pub clock: FakeClock,
    pub delay: FakeDelay,
}

impl FakeBoard {
    /// Clock at zero, all sensors bright, remote connected, no distance replies
    pub fn new() -> Self {
        let clock = FakeClock::default();
        Self {
            motors: FakeMotors::default(),
            servo: FakeServo::default(),
            indicator: FakeIndicator::default(),
            light: FakeLightSensors {
                readings: LightReadings {
                    left: BRIGHT,
                    right: BRIGHT,
                    rear: BRIGHT,
                },
                script: VecDeque::new(),
                reads: 0,
                lit: true,
            },
            distance: FakeDistance::default(),
            remote: FakeRemote {
                connected: true,
                ..FakeRemote::default()
            },
            delay: FakeDelay {
                clock: clock.clone(),
            },
            clock,
        }
    }
}

impl Board for FakeBoard {
    type Motors = FakeMotors;
    type Servo = FakeServo;
    type Indicator = FakeIndicator;
    type LightSensors = FakeLightSensors;
    type Distance = FakeDistance;
    type Remote = FakeRemote;
    type Clock = FakeClock;
    type Delay = FakeDelay;

    fn motors(&mut self) -> &mut FakeMotors {
        &mut self.motors
    }

    fn servo(&mut self) -> &mut FakeServo {
        &mut self.servo
    }

    fn indicator(&mut self) -> &mut FakeIndicator {
        &mut self.indicator
    }

    fn light_sensors(&mut self) -> &mut FakeLightSensors {
        &mut self.light
    }

    fn distance(&mut self) -> &mut FakeDistance {
        &mut self.distance
    }

    fn remote(&mut self) -> &mut FakeRemote {
        &mut self.remote
    }

    fn clock(&self) -> &FakeClock {
        &self.clock
    }

    fn delay(&mut self) -> &mut FakeDelay {
        &mut self.delay
    }
}
