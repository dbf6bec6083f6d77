//! Hardware Resource Management
//!
//! Assigns the RP2350 pins and peripherals to the parts of the board that own
//! them. Each group is handed out exactly once in `main`.
//!
//! # Resource Groups
//! - Motor Driver: TB6612FNG bridge, two PWM channels and five GPIOs
//! - Servo: pickup arm, driven from PIO because it runs at 40Hz
//! - RGB LED: three PWM channels
//! - Light Sensors: three ADC inputs and their illumination LEDs
//! - Distance Sensor: UART1 at 9600 baud
//! - Remote: UART0 to the dashboard bridge

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, PIO0, UART0, UART1};
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::uart::InterruptHandler as UartInterruptHandler;

assign_resources! {
    /// TB6612FNG dual motor driver pins and PWM channels
    motor_driver: MotorDriverResources {
        standby_pin: PIN_15,
        // Motor A, left wheel
        left_slice: PWM_SLICE2,
        left_pwm_pin: PIN_4,
        left_forward_pin: PIN_5,
        left_backward_pin: PIN_7,
        // Motor B, right wheel
        right_slice: PWM_SLICE6,
        right_pwm_pin: PIN_13,
        right_forward_pin: PIN_12,
        right_backward_pin: PIN_14,
    },
    /// Pickup arm servo
    servo: ServoResources {
        pin: PIN_6,
        pio: PIO0,
    },
    /// PWM-controlled RGB status LED
    rgb_led: RgbLedResources {
        red_blue_slice: PWM_SLICE0,
        red_pin: PIN_16,
        blue_pin: PIN_17,
        green_slice: PWM_SLICE1,
        green_pin: PIN_18,
    },
    /// Line sensors and the LEDs that light the track under them
    light_sensors: LightSensorResources {
        adc: ADC,
        left_pin: PIN_28,
        right_pin: PIN_27,
        rear_pin: PIN_26,
        left_led: PIN_21,
        right_led: PIN_19,
        rear_led: PIN_20,
    },
    /// Serial distance sensor
    distance_sensor: DistanceSensorResources {
        uart: UART1,
        tx_pin: PIN_8,
        rx_pin: PIN_9,
        tx_dma: DMA_CH0,
        rx_dma: DMA_CH1,
    },
    /// Serial link to the dashboard bridge
    remote: RemoteResources {
        uart: UART0,
        tx_pin: PIN_0,
        rx_pin: PIN_1,
        tx_dma: DMA_CH2,
        rx_dma: DMA_CH3,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    UART0_IRQ => UartInterruptHandler<UART0>;
    UART1_IRQ => UartInterruptHandler<UART1>;
});
