//! Remote Events
//!
//! Messages the robot sends to the remote dashboard besides the echo of every
//! inbound token.

use core::fmt::Write;

use crate::system::board::Message;
use crate::system::route::Command;

/// Outbound notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A crossing dispatched the route command at `index`
    RouteProgress { index: usize, command: &'a Command },
    /// The calibration routine finished
    CalibrationComplete,
}

impl Event<'_> {
    /// Renders the event in the dashboard's wire format
    pub fn render(&self) -> Message {
        let mut message = Message::new();
        match self {
            Event::RouteProgress { index, command } => {
                // A route token is at most 8 bytes, this always fits
                let _ = write!(message, "route_index:{}:{}", index, command.token());
            }
            Event::CalibrationComplete => {
                let _ = message.push_str("calibration_complete");
            }
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dashboard_format() {
        let command = Command::Turn180;
        assert_eq!(
            Event::RouteProgress {
                index: 12,
                command: &command
            }
            .render()
            .as_str(),
            "route_index:12:T180"
        );
        assert_eq!(
            Event::CalibrationComplete.render().as_str(),
            "calibration_complete"
        );
    }
}
