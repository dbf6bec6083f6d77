//! Line sensors on the ADC
//!
//! Each sensor is lit by its own LED, switched on from bring-up until
//! shutdown. Readings are 12-bit and scaled up to the 16-bit range the thresholds
//! use.

use embassy_rp::adc::{Adc, Blocking, Channel, Config};
use embassy_rp::gpio::{Level, Output, Pull};
use route_robot::system::board::{LightReadings, LightSensors};
use route_robot::system::error::DeviceError;

use super::resources::LightSensorResources;

pub struct AdcLightSensors {
    adc: Adc<'static, Blocking>,
    left: Channel<'static>,
    right: Channel<'static>,
    rear: Channel<'static>,
    leds: [Output<'static>; 3],
}

impl AdcLightSensors {
    pub fn new(r: LightSensorResources) -> Self {
        Self {
            adc: Adc::new_blocking(r.adc, Config::default()),
            left: Channel::new_pin(r.left_pin, Pull::None),
            right: Channel::new_pin(r.right_pin, Pull::None),
            rear: Channel::new_pin(r.rear_pin, Pull::None),
            leds: [
                Output::new(r.left_led, Level::High),
                Output::new(r.right_led, Level::High),
                Output::new(r.rear_led, Level::High),
            ],
        }
    }

    fn sample(&mut self, side: Side) -> Result<u16, DeviceError> {
        let channel = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Rear => &mut self.rear,
        };
        let raw = self
            .adc
            .blocking_read(channel)
            .map_err(|_| DeviceError::LightSensor)?;
        Ok(raw << 4)
    }
}

enum Side {
    Left,
    Right,
    Rear,
}

impl LightSensors for AdcLightSensors {
    fn read(&mut self) -> Result<LightReadings, DeviceError> {
        Ok(LightReadings {
            left: self.sample(Side::Left)?,
            right: self.sample(Side::Right)?,
            rear: self.sample(Side::Rear)?,
        })
    }

    fn power_down(&mut self) -> Result<(), DeviceError> {
        for led in &mut self.leds {
            led.set_low();
        }
        Ok(())
    }
}
