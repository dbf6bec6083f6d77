//! Remote Command Module
//!
//! Tokens the remote dashboard sends to the robot. Parsing never fails:
//! anything unrecognised becomes [`RemoteCommand::Unknown`] and is ignored after
//! being echoed.

/// Jog commands only honoured in manual mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum ManualCommand {
    Forward,
    Backward,
    Left,
    Right,
    Pickup,
}

/// Commands received over the remote link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum RemoteCommand {
    /// Start (or resume) following the route
    Start,
    /// Emergency stop: cancel every maneuver and zero the motors
    Stop,
    /// Toggle manual mode
    ManualControl,
    /// Run the calibration routine
    Calibrate,
    /// Rewind the route to its first command
    ResetRoute,
    /// Manual jog or pickup
    Manual(ManualCommand),
    /// Not a known token
    Unknown,
}

impl RemoteCommand {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "start" => RemoteCommand::Start,
            "stop" => RemoteCommand::Stop,
            "manualcontrol" => RemoteCommand::ManualControl,
            "kalibratie" => RemoteCommand::Calibrate,
            "resetroute" => RemoteCommand::ResetRoute,
            "forward" => RemoteCommand::Manual(ManualCommand::Forward),
            "backward" => RemoteCommand::Manual(ManualCommand::Backward),
            // The dashboard keyboard handler sends the camel-case names
            "left" | "turnLeft" => RemoteCommand::Manual(ManualCommand::Left),
            "right" | "turnRight" => RemoteCommand::Manual(ManualCommand::Right),
            "pickup" => RemoteCommand::Manual(ManualCommand::Pickup),
            _ => RemoteCommand::Unknown,
        }
    }
}
