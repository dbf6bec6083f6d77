//! Maneuver State Machines
//!
//! A maneuver is a timed, multi-step motion that owns the actuators until it
//! completes: reversing away from an obstacle, turning onto a crossing line,
//! turning around, lifting a target, crossing straight over, or a manual jog.
//!
//! Every maneuver runs `Idle -> Active -> Idle`. It is started once, then
//! updated on every tick with the current time and line flags until it reports
//! an [`Outcome`]. Only one maneuver may be active at a time: the
//! [`ManeuverSlot`] holds it and rejects a second start.

mod burst;
mod pickup;
mod reverse;
mod turn;
mod turn_around;

use embassy_time::{Duration, Instant};

use crate::system::board::{Board, ServoPosition};
use crate::system::error::{DeviceError, Error, ManeuverError};
use crate::system::state::LineFlags;

pub use burst::Jog;
pub use turn::Side;

use burst::Burst;
use pickup::Pickup;
use reverse::Reverse;
use turn::Turn;
use turn_around::TurnAround;

/// Maneuver kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum ManeuverKind {
    Reverse,
    TurnLeft,
    TurnRight,
    TurnAround,
    Pickup,
    Cross,
    Jog,
}

/// How a maneuver ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Outcome {
    /// Line following may take over again
    Resume,
    /// A turn found its line; counts as a crossing on the next drive step
    Turned,
    /// Motion stopped, nothing to resume
    Halted,
    /// Gave up without finding the line
    TimedOut,
}

/// Tick inputs a running maneuver may consult
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub now: Instant,
    pub line: LineFlags,
    /// `line` was sampled on this tick
    pub sampled: bool,
}

/// What to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Reverse,
    Turn {
        side: Side,
        timeout: Option<Duration>,
    },
    TurnAround {
        confirmations: u8,
    },
    Pickup {
        rest: ServoPosition,
    },
    Cross {
        after_reverse: bool,
    },
    Jog(Jog),
}

impl Plan {
    pub fn kind(&self) -> ManeuverKind {
        match self {
            Plan::Reverse => ManeuverKind::Reverse,
            Plan::Turn {
                side: Side::Left, ..
            } => ManeuverKind::TurnLeft,
            Plan::Turn {
                side: Side::Right, ..
            } => ManeuverKind::TurnRight,
            Plan::TurnAround { .. } => ManeuverKind::TurnAround,
            Plan::Pickup { .. } => ManeuverKind::Pickup,
            Plan::Cross { .. } => ManeuverKind::Cross,
            Plan::Jog(_) => ManeuverKind::Jog,
        }
    }
}

#[derive(Debug)]
enum Active {
    Reverse(Reverse),
    Turn(Turn),
    TurnAround(TurnAround),
    Pickup(Pickup),
    Burst(Burst),
}

impl Active {
    fn kind(&self) -> ManeuverKind {
        match self {
            Active::Reverse(_) => ManeuverKind::Reverse,
            Active::Turn(turn) => turn.kind(),
            Active::TurnAround(_) => ManeuverKind::TurnAround,
            Active::Pickup(_) => ManeuverKind::Pickup,
            Active::Burst(burst) => burst.kind(),
        }
    }
}

/// Holds the single active maneuver
#[derive(Debug, Default)]
pub struct ManeuverSlot {
    active: Option<Active>,
}

impl ManeuverSlot {
    pub const fn new() -> Self {
        Self { active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<ManeuverKind> {
        self.active.as_ref().map(Active::kind)
    }

    /// Starts a maneuver, issuing its first actuator commands
    ///
    /// Fails with [`ManeuverError::Busy`] and leaves everything untouched when
    /// another maneuver is active.
    pub fn start<B: Board>(&mut self, plan: Plan, board: &mut B, now: Instant) -> Result<(), Error> {
        if let Some(active) = self.active_kind() {
            return Err(ManeuverError::Busy {
                active,
                requested: plan.kind(),
            }
            .into());
        }

        let maneuver = match plan {
            Plan::Reverse => Active::Reverse(Reverse::start(board.motors(), now)?),
            Plan::Turn { side, timeout } => {
                Active::Turn(Turn::start(board.motors(), side, timeout, now)?)
            }
            Plan::TurnAround { confirmations } => {
                Active::TurnAround(TurnAround::start(board.motors(), confirmations, now)?)
            }
            Plan::Pickup { rest } => Active::Pickup(Pickup::start(board.servo(), rest, now)?),
            Plan::Cross { after_reverse } => {
                Active::Burst(Burst::cross(board.motors(), after_reverse, now)?)
            }
            Plan::Jog(jog) => Active::Burst(Burst::jog(board.motors(), jog, now)?),
        };
        debug!("maneuver {:?} started", maneuver.kind());
        self.active = Some(maneuver);
        Ok(())
    }

    /// Advances the active maneuver, emptying the slot when it finishes
    pub fn update<B: Board>(
        &mut self,
        board: &mut B,
        progress: Progress,
    ) -> Result<Option<Outcome>, DeviceError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };

        let outcome = match active {
            Active::Reverse(reverse) => reverse.update(board.motors(), progress)?,
            Active::Turn(turn) => turn.update(board.motors(), progress)?,
            Active::TurnAround(turn) => turn.update(board.motors(), progress)?,
            Active::Pickup(pickup) => pickup.update(board.servo(), progress)?,
            Active::Burst(burst) => burst.update(board.motors(), progress)?,
        };

        if let Some(outcome) = outcome {
            debug!("maneuver {:?} finished: {:?}", active.kind(), outcome);
            self.active = None;
        }
        Ok(outcome)
    }

    /// Drops the active maneuver without touching the actuators
    pub fn cancel(&mut self) -> Option<ManeuverKind> {
        let kind = self.active_kind();
        if let Some(kind) = kind {
            info!("maneuver {:?} cancelled", kind);
        }
        self.active = None;
        kind
    }
}
