//! RGB status LED on three PWM channels

use embassy_rp::pwm::{self, Pwm, PwmOutput, SetDutyCycle};
use route_robot::system::board::{Indicator, Rgb, FULL_SCALE};
use route_robot::system::error::DeviceError;

use super::resources::RgbLedResources;

/// LED PWM frequency, well above visible flicker
const PWM_FREQ_HZ: u32 = 1_000;

pub struct RgbLed {
    red: PwmOutput<'static>,
    blue: PwmOutput<'static>,
    green: Pwm<'static>,
}

impl RgbLed {
    pub fn new(r: RgbLedResources) -> Result<Self, DeviceError> {
        let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();
        let divider = ((clock_freq_hz / PWM_FREQ_HZ) / 65535 + 1) as u8;
        let period = (clock_freq_hz / (PWM_FREQ_HZ * divider as u32)) as u16 - 1;

        let mut config = pwm::Config::default();
        config.divider = divider.into();
        config.top = period;

        // red and blue share slice 0, green sits alone on slice 1
        let (red, blue) =
            Pwm::new_output_ab(r.red_blue_slice, r.red_pin, r.blue_pin, config.clone()).split();
        let green = Pwm::new_output_a(r.green_slice, r.green_pin, config);

        let mut led = Self {
            red: red.ok_or(DeviceError::Indicator)?,
            blue: blue.ok_or(DeviceError::Indicator)?,
            green,
        };
        led.set_rgb(Rgb::OFF)?;
        Ok(led)
    }
}

impl Indicator for RgbLed {
    fn set_rgb(&mut self, color: Rgb) -> Result<(), DeviceError> {
        self.red
            .set_duty_cycle_fraction(color.red, FULL_SCALE)
            .map_err(|_| DeviceError::Indicator)?;
        self.green
            .set_duty_cycle_fraction(color.green, FULL_SCALE)
            .map_err(|_| DeviceError::Indicator)?;
        self.blue
            .set_duty_cycle_fraction(color.blue, FULL_SCALE)
            .map_err(|_| DeviceError::Indicator)
    }
}
