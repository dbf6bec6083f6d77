//! Robot firmware entry point
//!
//! Brings up the board, spawns the serial link tasks and runs the navigation
//! tick until a device fails.

#![no_std]
#![no_main]

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_time::{Duration, Ticker};
use route_robot::system::board::Board;
use route_robot::system::config::NavConfig;
use route_robot::system::route::Route;
use route_robot::task::calibrate::check_sensors;
use route_robot::task::navigate::Navigator;
use {defmt_rtt as _, panic_probe as _};

use crate::board::distance_uart::distance_uart;
use crate::board::remote_uart::remote_uart;
use crate::board::resources::{
    AssignedResources, DistanceSensorResources, LightSensorResources, MotorDriverResources,
    RemoteResources, RgbLedResources, ServoResources,
};
use crate::board::RobotBoard;

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Board adapters
mod board;

/// Route flashed with the firmware, one command per line
const ROUTE: &str = include_str!("../route.txt");

/// Navigation tick period
const TICK: Duration = Duration::from_millis(10);

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = split_resources!(p);

    // The serial tasks must be running before the first tick triggers them
    spawner.spawn(distance_uart(r.distance_sensor)).unwrap();
    spawner.spawn(remote_uart(r.remote)).unwrap();

    let route = match Route::parse(ROUTE) {
        Ok(route) => route,
        Err(e) => {
            error!("route rejected: {:?}", e);
            Route::default()
        }
    };
    info!("route loaded, {} commands", route.len());

    let mut board = match RobotBoard::new(r.motor_driver, r.servo, r.rgb_led, r.light_sensors) {
        Ok(board) => board,
        Err(e) => {
            error!("board bring-up failed: {:?}", e);
            return;
        }
    };

    match check_sensors(board.light_sensors()) {
        Ok(true) => info!("light sensors ok"),
        Ok(false) => warn!("light sensors look dark, check wiring and LEDs"),
        Err(e) => error!("light sensor check failed: {:?}", e),
    }

    let mut navigator = Navigator::new(board, route, NavConfig::default());
    let mut ticker = Ticker::every(TICK);
    loop {
        if let Err(e) = navigator.tick() {
            error!("navigation halted: {:?}", e);
            navigator.shutdown();
            break;
        }
        ticker.next().await;
    }

    core::future::pending::<()>().await;
}
