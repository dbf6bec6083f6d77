//! Error types
//!
//! Only [`DeviceError`] is fatal: it propagates out of the navigation tick and
//! the caller runs the shutdown path. Everything else is logged where it happens
//! and the robot carries on.

use core::fmt;

use crate::task::maneuver::ManeuverKind;

/// A capability reported a hardware fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum DeviceError {
    Motor,
    Servo,
    Indicator,
    LightSensor,
}

/// Failure on the remote link. Never fatal, the session simply drops the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum LinkError {
    /// The transport is not connected
    Disconnected,
    /// Outbound queue is full or the transport refused the write
    SendFailed,
    /// The transport reported a receive failure
    ReceiveFailed,
}

/// A maneuver was requested while another one owns the actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum ManeuverError {
    Busy {
        active: ManeuverKind,
        requested: ManeuverKind,
    },
}

/// Route source could not be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum RouteError {
    /// More commands than the route buffer holds
    TooLong { capacity: usize },
}

/// Top level error of the navigation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Error {
    Device(DeviceError),
    Maneuver(ManeuverError),
}

impl From<DeviceError> for Error {
    fn from(err: DeviceError) -> Self {
        Error::Device(err)
    }
}

impl From<ManeuverError> for Error {
    fn from(err: ManeuverError) -> Self {
        Error::Maneuver(err)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Motor => f.write_str("motor driver fault"),
            DeviceError::Servo => f.write_str("servo fault"),
            DeviceError::Indicator => f.write_str("status indicator fault"),
            DeviceError::LightSensor => f.write_str("light sensor fault"),
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Disconnected => f.write_str("remote link disconnected"),
            LinkError::SendFailed => f.write_str("remote send failed"),
            LinkError::ReceiveFailed => f.write_str("remote receive failed"),
        }
    }
}

impl fmt::Display for ManeuverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManeuverError::Busy { active, requested } => write!(
                f,
                "cannot start {:?} while {:?} is active",
                requested, active
            ),
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::TooLong { capacity } => {
                write!(f, "route has more than {} commands", capacity)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Device(err) => fmt::Display::fmt(err, f),
            Error::Maneuver(err) => fmt::Display::fmt(err, f),
        }
    }
}
