//! Remote dashboard transport
//!
//! The dashboard talks newline-terminated text through a serial bridge on
//! UART0. A receive task assembles lines into the inbox, a transmit task drains
//! the outbox. The link counts as connected while lines keep arriving; after
//! a minute of silence, or once the session closes it, it is considered gone
//! until the next line arrives.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{info, warn};
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{self, Async, Uart, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use route_robot::system::board::{Message, RemoteLink};
use route_robot::system::error::LinkError;

use super::resources::{Irqs, RemoteResources};

const BAUD_RATE: u32 = 115_200;

/// Silence after which the client is considered gone
const LINK_IDLE: Duration = Duration::from_secs(60);

const INBOX_DEPTH: usize = 4;
const OUTBOX_DEPTH: usize = 8;

static CONNECTED: AtomicBool = AtomicBool::new(false);
static INBOX: Channel<CriticalSectionRawMutex, Message, INBOX_DEPTH> = Channel::new();
static OUTBOX: Channel<CriticalSectionRawMutex, Message, OUTBOX_DEPTH> = Channel::new();

/// Tick side handle
pub struct UartRemote;

impl RemoteLink for UartRemote {
    fn is_connected(&self) -> bool {
        CONNECTED.load(Ordering::Relaxed)
    }

    fn receive(&mut self) -> Result<Option<Message>, LinkError> {
        if !self.is_connected() {
            return Err(LinkError::Disconnected);
        }
        Ok(INBOX.try_receive().ok())
    }

    fn send(&mut self, message: &str) -> Result<(), LinkError> {
        if !self.is_connected() {
            return Err(LinkError::Disconnected);
        }
        let mut line = Message::new();
        line.push_str(message).map_err(|_| LinkError::SendFailed)?;
        OUTBOX.try_send(line).map_err(|_| LinkError::SendFailed)
    }

    fn close(&mut self) {
        CONNECTED.store(false, Ordering::Relaxed);
        INBOX.clear();
        OUTBOX.clear();
    }
}

#[embassy_executor::task]
pub async fn remote_uart(r: RemoteResources) {
    let mut config = uart::Config::default();
    config.baudrate = BAUD_RATE;
    let uart: Uart<'static, Async> = Uart::new(
        r.uart, r.tx_pin, r.rx_pin, Irqs, r.tx_dma, r.rx_dma, config,
    );
    let (tx, rx) = uart.split();
    join(receive_lines(rx), transmit_lines(tx)).await;
}

async fn receive_lines(mut rx: UartRx<'static, Async>) {
    let mut line = Message::new();
    loop {
        let mut byte = [0u8; 1];
        match select(rx.read(&mut byte), Timer::after(LINK_IDLE)).await {
            Either::First(Ok(())) => {}
            Either::First(Err(_)) => {
                warn!("remote uart receive error");
                line.clear();
                continue;
            }
            Either::Second(()) => {
                if CONNECTED.swap(false, Ordering::Relaxed) {
                    info!("remote link idle");
                }
                line.clear();
                continue;
            }
        }

        match byte[0] {
            b'\n' | b'\r' => {
                if line.is_empty() {
                    continue;
                }
                if !CONNECTED.swap(true, Ordering::Relaxed) {
                    info!("remote link up");
                }
                if INBOX.try_send(line.clone()).is_err() {
                    warn!("remote inbox full, dropping {}", line.as_str());
                }
                line.clear();
            }
            other => {
                // overlong lines are cut, the dashboard never sends them
                let _ = line.push(char::from(other));
            }
        }
    }
}

async fn transmit_lines(mut tx: UartTx<'static, Async>) {
    loop {
        let message = OUTBOX.receive().await;
        if tx.write(message.as_bytes()).await.is_err() || tx.write(b"\n").await.is_err() {
            warn!("remote uart write failed");
        }
    }
}
