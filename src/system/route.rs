//! Route Module
//!
//! The route is the ordered list of crossing commands computed offline by the
//! route planner. It is loaded once at startup, one token per line, and never
//! modified afterwards; the navigation controller only moves a cursor over it.

use heapless::{String, Vec};

use crate::system::error::RouteError;

/// Maximum number of commands in a route
pub const ROUTE_CAPACITY: usize = 128;

/// Unknown tokens are kept up to this many bytes for logging and reporting
pub const TOKEN_LEN: usize = 8;

/// What to do at the next crossing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Command {
    /// `F`: cross straight over
    Forward,
    /// `L`: turn left onto the crossing line
    TurnLeft,
    /// `R`: turn right onto the crossing line
    TurnRight,
    /// `T180`: turn around
    Turn180,
    /// `P`: lift the target at this crossing
    Pickup,
    /// `S`: stop driving
    Stop,
    /// Anything else, kept verbatim
    Unknown(String<TOKEN_LEN>),
}

impl Command {
    /// Parses one route token. Never fails: unknown tokens become [`Command::Unknown`].
    pub fn parse(token: &str) -> Self {
        match token {
            "F" => Command::Forward,
            "L" => Command::TurnLeft,
            "R" => Command::TurnRight,
            "T180" => Command::Turn180,
            "P" => Command::Pickup,
            "S" => Command::Stop,
            other => {
                let mut kept = String::new();
                for c in other.chars() {
                    if kept.push(c).is_err() {
                        break;
                    }
                }
                Command::Unknown(kept)
            }
        }
    }

    /// The token as it appears in the route source
    pub fn token(&self) -> &str {
        match self {
            Command::Forward => "F",
            Command::TurnLeft => "L",
            Command::TurnRight => "R",
            Command::Turn180 => "T180",
            Command::Pickup => "P",
            Command::Stop => "S",
            Command::Unknown(token) => token.as_str(),
        }
    }
}

/// Immutable ordered list of crossing commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    commands: Vec<Command, ROUTE_CAPACITY>,
}

impl Route {
    /// Parses a route source with one token per line
    ///
    /// Surrounding whitespace (including `\r`) is trimmed and blank lines are
    /// skipped.
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        let mut commands = Vec::new();
        for token in source.lines().map(str::trim).filter(|t| !t.is_empty()) {
            commands
                .push(Command::parse(token))
                .map_err(|_| RouteError::TooLong {
                    capacity: ROUTE_CAPACITY,
                })?;
        }
        Ok(Self { commands })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Whether any pickup remains at or after `index`
    pub fn has_pickup_from(&self, index: usize) -> bool {
        self.commands
            .iter()
            .skip(index)
            .any(|command| *command == Command::Pickup)
    }
}
