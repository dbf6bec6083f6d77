//! Line-following route robot
//!
//! Platform independent core of the robot: capability traits for every piece of
//! hardware, the maneuver state machines, the navigation tick, the remote control
//! session and the calibration routine. The RP2350 firmware in `main.rs` wires
//! these to real peripherals; host tests wire them to fakes.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

/// Shared types, capability traits and configuration
pub mod system;
/// Behaviour: maneuvers, navigation, remote control, calibration
pub mod task;
