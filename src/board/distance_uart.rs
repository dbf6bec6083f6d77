//! Serial distance sensor transport
//!
//! The UART runs in its own task. The navigation tick talks to it through two
//! signals: a trigger byte going out and the raw response coming back.
//! Nothing on the tick side ever waits.

use defmt::warn;
use embassy_rp::uart::{self, Async, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use heapless::Vec;
use route_robot::system::board::DistanceLink;
use route_robot::system::error::LinkError;

use super::resources::{DistanceSensorResources, Irqs};

const BAUD_RATE: u32 = 9_600;

/// Longest wait for a response, shorter than the tick side settle time
const RESPONSE_TIMEOUT: Duration = Duration::from_millis(90);

/// Response length in bytes
const RESPONSE_LEN: usize = 2;

static TRIGGER: Signal<CriticalSectionRawMutex, u8> = Signal::new();
static RESPONSE: Signal<CriticalSectionRawMutex, Vec<u8, RESPONSE_LEN>> = Signal::new();

/// Tick side handle
pub struct UartDistance;

impl DistanceLink for UartDistance {
    fn trigger(&mut self, byte: u8) -> Result<(), LinkError> {
        RESPONSE.reset();
        TRIGGER.signal(byte);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let Some(response) = RESPONSE.try_take() else {
            return Ok(0);
        };
        let len = response.len().min(buf.len());
        buf[..len].copy_from_slice(&response[..len]);
        Ok(len)
    }
}

#[embassy_executor::task]
pub async fn distance_uart(r: DistanceSensorResources) {
    let mut config = uart::Config::default();
    config.baudrate = BAUD_RATE;
    let mut uart: Uart<'static, Async> = Uart::new(
        r.uart, r.tx_pin, r.rx_pin, Irqs, r.tx_dma, r.rx_dma, config,
    );

    loop {
        let byte = TRIGGER.wait().await;

        if uart.write(&[byte]).await.is_err() {
            warn!("distance trigger write failed");
            RESPONSE.signal(Vec::new());
            continue;
        }

        let mut response = [0u8; RESPONSE_LEN];
        let received = match with_timeout(RESPONSE_TIMEOUT, uart.read(&mut response)).await {
            Ok(Ok(())) => &response[..],
            Ok(Err(_)) | Err(_) => &[][..],
        };
        RESPONSE.signal(Vec::from_slice(received).unwrap_or_default());
    }
}
