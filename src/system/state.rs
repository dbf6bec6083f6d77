//! Robot State
//!
//! Everything the navigation tick reads and writes lives in one owned
//! [`RobotState`], passed by `&mut` to the code that needs it. There are no
//! globals: the tick is the only thread of control.
//!
//! # State Components
//! - Navigation mode: which actuator-issuing logic may run
//! - Drive enable: whether line following may command the motors
//! - Route cursor and crossing bookkeeping
//! - Line sensor thresholds and the latest on-line flags
//! - Indicator inputs: last manual command, heading-to-finish flag

use embassy_time::Instant;

use crate::system::board::LightReadings;
use crate::system::remote_command::ManualCommand;
use crate::system::route::Command;

/// Robot navigation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum NavMode {
    /// Not moving, waiting for `start`
    Stopped,
    /// Following the route
    Driving,
    /// Remote jog commands drive the motors, route logic suspended
    Manual,
    /// A maneuver timed out; driving disabled until the next `start`
    Error,
    /// Calibration routine running
    Calibrating,
}

impl NavMode {
    /// Whether the route-following loop (sensors, maneuvers, crossings) runs
    pub fn runs_route(self) -> bool {
        matches!(self, NavMode::Driving | NavMode::Error)
    }
}

/// Whether a raw reading counts as "on the line" for the given threshold
pub fn on_line(reading: u16, threshold: u32) -> bool {
    u32::from(reading) < threshold
}

/// Line detection thresholds for the three sensors
///
/// Each value is the darkest valid reading seen during calibration plus a fixed
/// offset. Raw readings are 16-bit but a threshold may exceed `u16::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct Thresholds {
    pub left: u32,
    pub right: u32,
    pub rear: u32,
}

impl Thresholds {
    /// Factory values used until the first calibration run
    pub const FACTORY: Thresholds = Thresholds {
        left: 29_565,
        right: 19_179,
        rear: 22_380,
    };

    /// Classifies one set of readings
    pub fn classify(&self, readings: LightReadings) -> LineFlags {
        LineFlags {
            left: on_line(readings.left, self.left),
            right: on_line(readings.right, self.right),
            rear: on_line(readings.rear, self.rear),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::FACTORY
    }
}

/// Per-sensor "on line" flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct LineFlags {
    pub left: bool,
    pub right: bool,
    pub rear: bool,
}

impl LineFlags {
    /// Either front side sensor sees the line
    pub fn either_side(&self) -> bool {
        self.left || self.right
    }
}

/// Robot state owned by the navigation controller
#[derive(Debug, Clone)]
pub struct RobotState {
    /// Current navigation mode
    pub mode: NavMode,
    /// Line following may command the motors
    /// - cleared when a crossing is dispatched
    /// - set again when the dispatched maneuver completes
    pub driving: bool,
    /// Index of the next route command
    pub route_index: usize,
    /// Last command dispatched from the route
    pub last_command: Option<Command>,
    /// A turn just found its line; counts as a crossing on the next drive step
    pub turn_completed: bool,
    /// Time of the last dispatched crossing, for debouncing
    pub last_crossing: Option<Instant>,
    /// The last reverse has not been followed by a crossing burst yet
    pub post_reverse: bool,
    /// No pickups left on the route
    pub heading_to_finish: bool,
    /// Last jog command from the remote, for the manual indicator colour
    pub last_manual: Option<ManualCommand>,
    /// Line sensor thresholds
    pub thresholds: Thresholds,
    /// Latest sampled line flags
    pub line: LineFlags,
}

impl RobotState {
    pub fn new() -> Self {
        Self {
            mode: NavMode::Stopped,
            driving: false,
            route_index: 0,
            last_command: None,
            turn_completed: false,
            last_crossing: None,
            post_reverse: false,
            heading_to_finish: false,
            last_manual: None,
            thresholds: Thresholds::FACTORY,
            line: LineFlags::default(),
        }
    }

    /// Updates the navigation mode, logging real transitions
    pub fn set_mode(&mut self, new_mode: NavMode) {
        if self.mode != new_mode {
            info!("mode {:?} -> {:?}", self.mode, new_mode);
            self.mode = new_mode;
        }
    }

    /// The last dispatched command was a pickup, which forces the next crossing
    pub fn pickup_pending(&self) -> bool {
        matches!(self.last_command, Some(Command::Pickup))
    }

    /// Rewinds the route cursor and its crossing bookkeeping
    pub fn reset_route(&mut self) {
        self.route_index = 0;
        self.last_command = None;
        self.turn_completed = false;
        self.last_crossing = None;
        self.heading_to_finish = false;
    }
}

impl Default for RobotState {
    fn default() -> Self {
        Self::new()
    }
}
