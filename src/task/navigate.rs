//! Navigation Controller
//!
//! The [`Navigator`] owns the board, the route and all robot state, and runs
//! one non-blocking [`Navigator::tick`] per control cycle. Every periodic
//! activity is gated by an [`Interval`], so the tick itself never waits.
//!
//! # Tick
//! 1. While following the route: sample the line sensors every 50ms
//! 2. Update the active maneuver and the distance request
//! 3. With driving enabled and no maneuver active, every 50ms:
//!    - back off from obstacles closer than 10cm
//!    - detect and debounce crossings, dispatching the next route command
//!    - otherwise follow the line
//! 4. Re-render the status LED
//! 5. Every 100ms handle one remote command
//!
//! Only hardware faults leave the tick as errors. The caller is expected to run
//! [`Navigator::shutdown`] and halt.

use embassy_time::{Duration, Instant};

use crate::system::board::{
    Board, Clock, Indicator, LightSensors, Motors, RemoteLink, Rgb, Servo, ServoPosition,
};
use crate::system::config::NavConfig;
use crate::system::drive_command::Drive;
use crate::system::error::Error;
use crate::system::event::Event;
use crate::system::indicator::{IndicatorInputs, Pattern};
use crate::system::remote_command::{ManualCommand, RemoteCommand};
use crate::system::route::{Command, Route};
use crate::system::state::{NavMode, RobotState};
use crate::task::calibrate::{self, Minima};
use crate::task::distance_measure::DistanceMeasure;
use crate::task::drive::{self, Correction, CRUISE_POWER};
use crate::task::maneuver::{Jog, ManeuverKind, ManeuverSlot, Outcome, Plan, Progress, Side};
use crate::task::remote_control::RemoteSession;
use crate::task::rgb_led_indicate::RgbLedIndicate;
use crate::task::scheduler::Interval;

/// Line sensor sampling period
const SENSOR_INTERVAL: Duration = Duration::from_millis(50);
/// Line following and crossing detection period
const DRIVE_INTERVAL: Duration = Duration::from_millis(50);
/// Remote polling period
const REMOTE_INTERVAL: Duration = Duration::from_millis(100);
/// Minimum time between two crossings
const CROSSING_DEBOUNCE: Duration = Duration::from_millis(1_000);

/// Top level navigation state machine
pub struct Navigator<B: Board> {
    board: B,
    route: Route,
    config: NavConfig,
    state: RobotState,
    maneuver: ManeuverSlot,
    distance: DistanceMeasure,
    indicator: RgbLedIndicate,
    remote: RemoteSession,
    minima: Minima,
    sensor_interval: Interval,
    drive_interval: Interval,
    remote_interval: Interval,
}

impl<B: Board> Navigator<B> {
    pub fn new(board: B, route: Route, config: NavConfig) -> Self {
        info!("navigator ready, route of {} commands", route.len());
        Self {
            board,
            route,
            config,
            state: RobotState::new(),
            maneuver: ManeuverSlot::new(),
            distance: DistanceMeasure::new(),
            indicator: RgbLedIndicate::new(),
            remote: RemoteSession::new(),
            minima: Minima::new(),
            sensor_interval: Interval::new(SENSOR_INTERVAL),
            drive_interval: Interval::new(DRIVE_INTERVAL),
            remote_interval: Interval::new(REMOTE_INTERVAL),
        }
    }

    pub fn state(&self) -> &RobotState {
        &self.state
    }

    pub fn active_maneuver(&self) -> Option<ManeuverKind> {
        self.maneuver.active_kind()
    }

    /// Last completed distance reading in centimetres
    pub fn distance_cm(&self) -> Option<f32> {
        self.distance.last()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// Runs one control cycle
    pub fn tick(&mut self) -> Result<(), Error> {
        let now = self.board.clock().now();
        let mode = self.state.mode;

        if mode.runs_route() || mode == NavMode::Manual {
            let sampled = mode.runs_route() && self.sensor_interval.due(now);
            if sampled {
                let readings = self.board.light_sensors().read()?;
                self.state.line = self.state.thresholds.classify(readings);
            }

            let progress = Progress {
                now,
                line: self.state.line,
                sampled,
            };
            if let Some(outcome) = self.maneuver.update(&mut self.board, progress)? {
                self.finish(outcome);
            }

            if mode.runs_route() {
                self.distance.update(self.board.distance(), now);
                if self.state.driving && !self.maneuver.is_active() && self.drive_interval.due(now)
                {
                    self.drive_step(now)?;
                }
            }
        }

        self.render_indicator()?;

        if self.remote_interval.due(now) {
            if let Some(command) = self.remote.poll(self.board.remote()) {
                self.apply_remote(command, now)?;
            }
        }
        Ok(())
    }

    /// Leaves every actuator in a safe state. Best effort: a failing device is
    /// logged and the remaining ones are still shut down.
    pub fn shutdown(&mut self) {
        info!("shutting down");
        self.maneuver.cancel();
        self.state.driving = false;
        self.state.set_mode(NavMode::Stopped);

        if let Err(err) = drive::halt(self.board.motors()) {
            error!("shutdown: {:?}", err);
        }
        if let Err(err) = self.board.servo().set_position(ServoPosition::Down) {
            error!("shutdown: {:?}", err);
        }
        if let Err(err) = self.board.indicator().set_rgb(Rgb::OFF) {
            error!("shutdown: {:?}", err);
        }
        if let Err(err) = self.board.light_sensors().power_down() {
            error!("shutdown: {:?}", err);
        }
        self.board.remote().close();
    }

    fn finish(&mut self, outcome: Outcome) {
        let driving = self.state.mode == NavMode::Driving;
        match outcome {
            Outcome::Resume => self.state.driving |= driving,
            Outcome::Turned => {
                if driving {
                    self.state.driving = true;
                    self.state.turn_completed = true;
                }
            }
            Outcome::Halted => {}
            Outcome::TimedOut => {
                self.state.driving = false;
                self.state.set_mode(NavMode::Error);
            }
        }
    }

    fn drive_step(&mut self, now: Instant) -> Result<(), Error> {
        self.distance.ensure_requested(self.board.distance(), now);
        if self.distance.obstacle() {
            info!(
                "obstacle at {} cm, backing off",
                self.distance.last().unwrap_or_default()
            );
            self.state.post_reverse = true;
            return self.begin(Plan::Reverse, now);
        }

        let pickup_marker = self.state.pickup_pending();
        if self.state.line.rear || pickup_marker || self.state.turn_completed {
            self.state.turn_completed = false;
            let debounced = self
                .state
                .last_crossing
                .map_or(true, |at| now.saturating_duration_since(at) >= CROSSING_DEBOUNCE);
            if debounced || pickup_marker {
                return self.cross(now);
            }
        }

        self.board.servo().set_position(ServoPosition::Down)?;
        let correction = Correction::from_line(self.state.line);
        trace!("line follow {:?}", correction);
        drive::apply(self.board.motors(), correction.drive())?;
        Ok(())
    }

    fn cross(&mut self, now: Instant) -> Result<(), Error> {
        drive::halt(self.board.motors())?;
        self.state.last_crossing = Some(now);

        let index = self.state.route_index;
        let Some(command) = self.route.get(index).cloned() else {
            info!("crossing {}: end of route", index);
            self.state.driving = false;
            return Ok(());
        };

        info!("crossing {}: {}", index, command.token());
        self.remote.notify(
            self.board.remote(),
            Event::RouteProgress {
                index,
                command: &command,
            },
        );
        self.state.driving = false;
        if !self.state.heading_to_finish && !self.route.has_pickup_from(index) {
            info!("no pickups left, heading to finish");
            self.state.heading_to_finish = true;
        }

        self.dispatch(&command, now)?;
        self.state.route_index += 1;
        self.state.last_command = Some(command);
        Ok(())
    }

    fn dispatch(&mut self, command: &Command, now: Instant) -> Result<(), Error> {
        match command {
            Command::Forward => {
                let after_reverse = core::mem::take(&mut self.state.post_reverse);
                self.begin(Plan::Cross { after_reverse }, now)
            }
            Command::TurnLeft => self.begin(
                Plan::Turn {
                    side: Side::Left,
                    timeout: self.config.turn_timeout,
                },
                now,
            ),
            Command::TurnRight => self.begin(
                Plan::Turn {
                    side: Side::Right,
                    timeout: self.config.turn_timeout,
                },
                now,
            ),
            Command::Turn180 => self.begin(
                Plan::TurnAround {
                    confirmations: self.config.turn_around_confirmations,
                },
                now,
            ),
            Command::Pickup => self.begin(
                Plan::Pickup {
                    rest: ServoPosition::Mid,
                },
                now,
            ),
            Command::Stop => {
                info!("route stop");
                self.state.set_mode(NavMode::Stopped);
                Ok(())
            }
            Command::Unknown(token) => {
                warn!("unknown route command {}, skipping", token.as_str());
                self.state.driving = true;
                Ok(())
            }
        }
    }

    /// Starts a maneuver. A busy slot is logged and otherwise ignored.
    fn begin(&mut self, plan: Plan, now: Instant) -> Result<(), Error> {
        match self.maneuver.start(plan, &mut self.board, now) {
            Err(Error::Maneuver(err)) => {
                warn!("maneuver rejected: {:?}", err);
                Ok(())
            }
            result => result,
        }
    }

    fn render_indicator(&mut self) -> Result<(), Error> {
        let inputs = IndicatorInputs {
            mode: self.state.mode,
            active: self.maneuver.active_kind(),
            last_manual: self.state.last_manual,
            heading_to_finish: self.state.heading_to_finish,
        };
        let pattern: Pattern = self.indicator.render(self.board.indicator(), inputs)?;
        trace!("indicator {:?}", pattern);
        Ok(())
    }

    fn apply_remote(&mut self, command: RemoteCommand, now: Instant) -> Result<(), Error> {
        match command {
            RemoteCommand::Start => self.start(),
            RemoteCommand::Stop => self.stop(),
            RemoteCommand::ManualControl => self.toggle_manual(),
            RemoteCommand::Calibrate => self.calibrate(),
            RemoteCommand::ResetRoute => {
                info!("route reset");
                self.state.reset_route();
                Ok(())
            }
            RemoteCommand::Manual(manual) if self.state.mode == NavMode::Manual => {
                self.manual(manual, now)
            }
            RemoteCommand::Manual(manual) => {
                info!("ignoring {:?} outside manual mode", manual);
                Ok(())
            }
            RemoteCommand::Unknown => Ok(()),
        }
    }

    fn start(&mut self) -> Result<(), Error> {
        self.maneuver.cancel();
        self.state.last_manual = None;
        self.state.set_mode(NavMode::Driving);
        self.state.driving = true;
        drive::apply(
            self.board.motors(),
            Drive::forward(CRUISE_POWER, CRUISE_POWER),
        )?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        self.halt_motion()?;
        self.state.post_reverse = false;
        if self.state.mode != NavMode::Manual {
            self.state.set_mode(NavMode::Stopped);
        }
        Ok(())
    }

    fn toggle_manual(&mut self) -> Result<(), Error> {
        self.halt_motion()?;
        if self.state.mode == NavMode::Manual {
            self.state.set_mode(NavMode::Stopped);
        } else {
            self.state.last_manual = None;
            self.state.set_mode(NavMode::Manual);
        }
        Ok(())
    }

    fn manual(&mut self, command: ManualCommand, now: Instant) -> Result<(), Error> {
        self.state.last_manual = Some(command);
        let plan = match command {
            ManualCommand::Forward => Plan::Jog(Jog::Forward),
            ManualCommand::Backward => Plan::Jog(Jog::Backward),
            ManualCommand::Left => Plan::Jog(Jog::Left),
            ManualCommand::Right => Plan::Jog(Jog::Right),
            ManualCommand::Pickup => Plan::Pickup {
                rest: ServoPosition::Down,
            },
        };
        self.begin(plan, now)
    }

    fn calibrate(&mut self) -> Result<(), Error> {
        self.halt_motion()?;
        self.state.set_mode(NavMode::Calibrating);

        self.state.thresholds =
            calibrate::calibrate(&mut self.board, &mut self.minima, self.state.thresholds)?;

        self.state.set_mode(NavMode::Stopped);
        let now = self.board.clock().now();
        self.remote_interval.reset(now);
        self.remote
            .notify(self.board.remote(), Event::CalibrationComplete);
        Ok(())
    }

    /// Cancels every maneuver and zeroes the motors
    fn halt_motion(&mut self) -> Result<(), Error> {
        self.maneuver.cancel();
        self.state.driving = false;
        self.board.motors().set_power(0, 0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::board::Direction;
    use crate::system::error::DeviceError;
    use crate::system::mock::{FakeBoard, BRIGHT, DARK};
    use crate::system::state::Thresholds;

    const TICK: Duration = Duration::from_millis(10);

    type Nav = Navigator<FakeBoard>;

    fn navigator(route: &str, config: NavConfig) -> Nav {
        let mut board = FakeBoard::new();
        board.light.set(DARK, DARK, BRIGHT);
        Navigator::new(board, Route::parse(route).unwrap(), config)
    }

    fn step(nav: &mut Nav) {
        nav.tick().unwrap();
        nav.board.clock.advance(TICK);
    }

    fn now(nav: &Nav) -> Instant {
        nav.board.clock.now()
    }

    /// Ticks until `done` holds, failing after `limit`
    fn run_until(nav: &mut Nav, limit: Duration, done: impl Fn(&Nav) -> bool) {
        let deadline = now(nav) + limit;
        while !done(nav) {
            assert!(now(nav) < deadline, "condition not reached in time");
            step(nav);
        }
    }

    fn run_for(nav: &mut Nav, duration: Duration) {
        let end = now(nav) + duration;
        while now(nav) < end {
            step(nav);
        }
    }

    fn send(nav: &mut Nav, token: &str) {
        nav.board.remote.push(token);
        run_until(nav, Duration::from_millis(200), |nav| {
            nav.board.remote.inbox.is_empty()
        });
    }

    fn started(route: &str, config: NavConfig) -> Nav {
        let mut nav = navigator(route, config);
        send(&mut nav, "start");
        assert_eq!(nav.state.mode, NavMode::Driving);
        nav
    }

    fn events(nav: &Nav) -> std::vec::Vec<&str> {
        nav.board
            .remote
            .outbox
            .iter()
            .map(std::string::String::as_str)
            .filter(|message| message.starts_with("route_index:"))
            .collect()
    }

    /// Puts the rear sensor on the line until the next crossing is dispatched
    fn hit_crossing(nav: &mut Nav) {
        let index = nav.state.route_index;
        let (left, right) = (nav.board.light.readings.left, nav.board.light.readings.right);
        nav.board.light.set(left, right, DARK);
        run_until(nav, Duration::from_millis(1_500), |nav| {
            nav.state.route_index > index
        });
        nav.board.light.set(left, right, BRIGHT);
    }

    #[test]
    fn start_drives_forward_at_cruise_power() {
        let nav = started("F", NavConfig::default());
        assert!(nav.state.driving);
        assert_eq!(nav.board.remote.outbox[0], "start");
        assert_eq!(
            nav.board.motors.direction(),
            Some((Direction::Forward, Direction::Forward))
        );
        assert_eq!(nav.board.motors.power(), (60_000, 60_000));
    }

    #[test]
    fn follows_the_line() {
        let mut nav = started("F", NavConfig::default());
        run_for(&mut nav, Duration::from_millis(100));
        assert_eq!(nav.board.motors.power(), (60_000, 60_000));
        assert_eq!(nav.board.servo.position(), Some(ServoPosition::Down));

        nav.board.light.set(DARK, BRIGHT, BRIGHT);
        run_for(&mut nav, Duration::from_millis(100));
        assert_eq!(nav.board.motors.power(), (65_000, 35_000));

        nav.board.light.set(BRIGHT, DARK, BRIGHT);
        run_for(&mut nav, Duration::from_millis(100));
        assert_eq!(nav.board.motors.power(), (35_000, 65_000));

        nav.board.light.set(BRIGHT, BRIGHT, BRIGHT);
        run_for(&mut nav, Duration::from_millis(100));
        assert_eq!(nav.board.motors.power(), (65_000, 35_000));
    }

    #[test]
    fn runs_a_full_route() {
        let mut nav = started("F\nL\nP\nS", NavConfig::default());

        hit_crossing(&mut nav);
        assert_eq!(events(&nav), ["route_index:0:F"]);
        assert_eq!(nav.active_maneuver(), Some(ManeuverKind::Cross));
        assert_eq!(nav.board.motors.power(), (45_000, 45_000));
        run_until(&mut nav, Duration::from_millis(400), |nav| nav.state.driving);
        assert_eq!(nav.active_maneuver(), None);

        // a second rear hit within a second of the last crossing is ignored
        nav.board.light.set(DARK, DARK, DARK);
        run_for(&mut nav, Duration::from_millis(300));
        assert_eq!(nav.state.route_index, 1);
        nav.board.light.set(DARK, DARK, BRIGHT);
        run_for(&mut nav, Duration::from_millis(500));

        // the turn has to stay off the line past the debounce time so its
        // completion counts as the next crossing
        nav.board.light.set(BRIGHT, BRIGHT, BRIGHT);
        hit_crossing(&mut nav);
        assert_eq!(nav.active_maneuver(), Some(ManeuverKind::TurnLeft));
        assert!(!nav.state.driving);
        run_for(&mut nav, Duration::from_millis(1_200));
        assert_eq!(nav.active_maneuver(), Some(ManeuverKind::TurnLeft));
        nav.board.light.set(DARK, DARK, BRIGHT);

        run_until(&mut nav, Duration::from_millis(200), |nav| {
            nav.active_maneuver() == Some(ManeuverKind::Pickup)
        });
        assert_eq!(nav.state.route_index, 3);
        assert_eq!(nav.board.servo.position(), Some(ServoPosition::Up));
        assert!(!nav.state.heading_to_finish);

        // the pickup marker forces the next crossing straight away
        run_until(&mut nav, Duration::from_millis(1_000), |nav| {
            nav.state.route_index == 4
        });
        assert!(nav.board.servo.positions.contains(&ServoPosition::Mid));
        assert_eq!(
            events(&nav),
            [
                "route_index:0:F",
                "route_index:1:L",
                "route_index:2:P",
                "route_index:3:S"
            ]
        );
        assert!(nav.state.heading_to_finish);
        assert_eq!(nav.state.mode, NavMode::Stopped);
        assert!(!nav.state.driving);
        assert_eq!(nav.board.motors.power(), (0, 0));

        step(&mut nav);
        assert_eq!(nav.board.indicator.color, Rgb::new(0, 0, 65_535));
    }

    #[test]
    fn end_of_route_stops_driving() {
        let mut nav = started("F", NavConfig::default());
        hit_crossing(&mut nav);
        run_for(&mut nav, Duration::from_millis(1_100));

        nav.board.light.set(DARK, DARK, DARK);
        run_until(&mut nav, Duration::from_millis(200), |nav| !nav.state.driving);
        assert_eq!(nav.state.route_index, 1);
        assert_eq!(nav.active_maneuver(), None);
        assert_eq!(nav.board.motors.power(), (0, 0));
        assert_eq!(events(&nav), ["route_index:0:F"]);
    }

    #[test]
    fn unknown_route_command_resumes_driving() {
        let mut nav = started("X\nF", NavConfig::default());
        hit_crossing(&mut nav);
        assert_eq!(events(&nav), ["route_index:0:X"]);
        assert!(nav.state.driving);
        assert_eq!(nav.active_maneuver(), None);
    }

    #[test]
    fn backs_off_from_an_obstacle_and_resumes() {
        let mut nav = started("F", NavConfig::default());
        nav.board.distance.respond_tenths(50);

        run_until(&mut nav, Duration::from_millis(300), |nav| {
            nav.active_maneuver() == Some(ManeuverKind::Reverse)
        });
        let started = now(&nav);
        assert_eq!(nav.distance_cm(), Some(5.0));
        assert_eq!(
            nav.board.motors.direction(),
            Some((Direction::Reverse, Direction::Reverse))
        );
        assert_eq!(nav.board.motors.power(), (25_000, 25_000));

        run_until(&mut nav, Duration::from_millis(1_600), |nav| {
            nav.active_maneuver().is_none()
        });
        let reversed = now(&nav).saturating_duration_since(started);
        assert!(reversed >= Duration::from_millis(1_500));
        assert!(reversed <= Duration::from_millis(1_520));
        assert!(nav.state.driving);

        run_for(&mut nav, Duration::from_millis(100));
        assert_eq!(nav.board.motors.power(), (60_000, 60_000));

        // the first crossing burst after a reverse is stronger
        hit_crossing(&mut nav);
        assert_eq!(nav.board.motors.power(), (55_000, 55_000));
        assert!(!nav.state.post_reverse);
    }

    #[test]
    fn remote_stop_cancels_a_turn() {
        let mut nav = started("L\nP", NavConfig::default());
        nav.board.light.set(BRIGHT, BRIGHT, BRIGHT);
        hit_crossing(&mut nav);
        assert_eq!(nav.active_maneuver(), Some(ManeuverKind::TurnLeft));

        send(&mut nav, "stop");
        assert_eq!(nav.active_maneuver(), None);
        assert_eq!(nav.state.mode, NavMode::Stopped);
        assert!(!nav.state.driving);
        assert_eq!(nav.board.motors.power(), (0, 0));

        run_for(&mut nav, Duration::from_millis(2_000));
        assert_eq!(nav.board.motors.power(), (0, 0));
        assert_eq!(nav.board.indicator.color, Rgb::OFF);
    }

    #[test]
    fn turn_around_times_out_into_error() {
        let mut nav = started("T180\nP", NavConfig::default());
        nav.board.light.set(BRIGHT, BRIGHT, BRIGHT);
        hit_crossing(&mut nav);
        assert_eq!(nav.active_maneuver(), Some(ManeuverKind::TurnAround));
        let started = now(&nav);

        run_until(&mut nav, Duration::from_millis(10_100), |nav| {
            nav.active_maneuver().is_none()
        });
        assert!(now(&nav).saturating_duration_since(started) >= Duration::from_secs(10));
        assert_eq!(nav.state.mode, NavMode::Error);
        assert!(!nav.state.driving);
        assert_eq!(nav.board.motors.power(), (0, 0));

        // red blink while in error
        let mut saw_red = false;
        for _ in 0..40 {
            step(&mut nav);
            saw_red |= nav.board.indicator.color == Rgb::new(65_535, 0, 0);
        }
        assert!(saw_red);
        assert_eq!(nav.board.motors.power(), (0, 0));

        send(&mut nav, "start");
        assert_eq!(nav.state.mode, NavMode::Driving);
        assert!(nav.state.driving);
    }

    #[test]
    fn turn_around_waits_for_confirmations() {
        let config = NavConfig {
            turn_around_confirmations: 2,
            ..NavConfig::default()
        };
        let mut nav = started("T180\nF", config);
        nav.board.light.set(BRIGHT, BRIGHT, BRIGHT);
        hit_crossing(&mut nav);
        run_for(&mut nav, Duration::from_millis(2_500));
        assert_eq!(nav.board.motors.power(), (20_000, 20_000));

        nav.board.light.set(DARK, BRIGHT, BRIGHT);
        run_for(&mut nav, Duration::from_millis(60));
        assert_eq!(nav.active_maneuver(), Some(ManeuverKind::TurnAround));
        run_until(&mut nav, Duration::from_millis(100), |nav| {
            nav.active_maneuver() != Some(ManeuverKind::TurnAround)
        });
        assert_eq!(nav.state.mode, NavMode::Driving);

        // the completed turn counts as the next crossing
        run_until(&mut nav, Duration::from_millis(100), |nav| {
            nav.state.route_index == 2
        });
        assert_eq!(events(&nav), ["route_index:0:T180", "route_index:1:F"]);
    }

    #[test]
    fn at_most_one_maneuver_and_monotonic_route_index() {
        let mut nav = started("F\nR\nT180\nF\nP\nL\nF\nF\nS", NavConfig::default());
        let mut last_index = 0;
        let mut last_crossing: Option<Instant> = None;
        for ms in (0..30_000u64).step_by(10) {
            // rear crosses a line for 100ms every 700ms, sides wobble
            let rear = if ms % 700 < 100 { DARK } else { BRIGHT };
            let left = if ms % 900 < 450 { DARK } else { BRIGHT };
            let right = if ms % 1_300 < 900 { DARK } else { BRIGHT };
            nav.board.light.set(left, right, rear);
            if ms % 5_000 == 0 {
                nav.board.distance.respond_tenths(80);
            }
            step(&mut nav);

            let index = nav.state.route_index;
            assert!(index >= last_index, "route index went backwards");
            if index > last_index {
                assert_eq!(index, last_index + 1);
                let crossing = nav.state.last_crossing.unwrap();
                if let Some(previous) = last_crossing {
                    // only a pickup may bypass the debounce
                    let forced = last_index > 0
                        && nav.route.get(last_index - 1) == Some(&Command::Pickup);
                    assert!(
                        forced || crossing.saturating_duration_since(previous) >= CROSSING_DEBOUNCE
                    );
                }
                last_crossing = Some(crossing);
            }
            last_index = index;
            assert_eq!(events(&nav).len(), index);
        }
        assert!(last_index > 0);
    }

    #[test]
    fn manual_mode_jogs_and_picks_up() {
        let mut nav = started("F", NavConfig::default());
        send(&mut nav, "manualcontrol");
        assert_eq!(nav.state.mode, NavMode::Manual);
        assert!(!nav.state.driving);
        assert_eq!(nav.board.motors.power(), (0, 0));

        nav.board.remote.push("backward");
        run_until(&mut nav, Duration::from_millis(200), |nav| {
            nav.active_maneuver() == Some(ManeuverKind::Jog)
        });
        assert_eq!(nav.board.motors.power(), (50_000, 42_000));
        assert_eq!(
            nav.board.motors.direction(),
            Some((Direction::Reverse, Direction::Reverse))
        );
        step(&mut nav);
        assert_eq!(nav.board.indicator.color, Rgb::new(40_000, 0, 65_535));
        run_for(&mut nav, Duration::from_millis(120));
        assert_eq!(nav.active_maneuver(), None);
        assert_eq!(nav.board.motors.power(), (0, 0));

        send(&mut nav, "pickup");
        assert_eq!(nav.board.servo.position(), Some(ServoPosition::Up));
        run_for(&mut nav, Duration::from_millis(900));
        assert_eq!(nav.board.servo.position(), Some(ServoPosition::Down));
        assert!(!nav.state.driving);

        // stop keeps manual mode
        send(&mut nav, "stop");
        assert_eq!(nav.state.mode, NavMode::Manual);

        send(&mut nav, "manualcontrol");
        assert_eq!(nav.state.mode, NavMode::Stopped);
        let calls = nav.board.motors.calls.len();
        send(&mut nav, "forward");
        assert_eq!(nav.board.motors.calls.len(), calls);
        assert_eq!(nav.active_maneuver(), None);
    }

    #[test]
    fn reset_route_rewinds_the_cursor() {
        let mut nav = started("F\nP\nS", NavConfig::default());
        hit_crossing(&mut nav);
        assert_eq!(nav.state.route_index, 1);
        send(&mut nav, "stop");
        send(&mut nav, "resetroute");
        assert_eq!(nav.state.route_index, 0);
        assert!(!nav.state.pickup_pending());
        assert!(!nav.state.heading_to_finish);
    }

    #[test]
    fn calibration_updates_thresholds_and_reports() {
        let mut nav = started("F", NavConfig::default());
        nav.board.light.set(14_000, 16_000, 18_000);
        send(&mut nav, "kalibratie");

        assert_eq!(
            nav.state.thresholds,
            Thresholds {
                left: 18_000,
                right: 20_000,
                rear: 22_000
            }
        );
        assert_eq!(nav.state.mode, NavMode::Stopped);
        assert!(!nav.state.driving);
        assert_eq!(nav.board.motors.power(), (0, 0));
        assert_eq!(
            nav.board.remote.outbox.last().map(std::string::String::as_str),
            Some("calibration_complete")
        );
    }

    #[test]
    fn device_fault_escapes_the_tick_and_shutdown_is_safe() {
        let mut nav = started("F", NavConfig::default());
        run_for(&mut nav, Duration::from_millis(100));
        nav.board.motors.fail = true;

        let mut result = Ok(());
        for _ in 0..10 {
            result = nav.tick();
            if result.is_err() {
                break;
            }
            nav.board.clock.advance(TICK);
        }
        assert_eq!(result, Err(Error::Device(DeviceError::Motor)));

        nav.board.motors.fail = false;
        assert!(nav.board.light.lit);
        nav.shutdown();
        assert_eq!(nav.board.motors.power(), (0, 0));
        assert_eq!(nav.board.servo.position(), Some(ServoPosition::Down));
        assert_eq!(nav.board.indicator.color, Rgb::OFF);
        assert!(!nav.board.light.lit);
        assert!(!nav.board.remote.connected);
        assert_eq!(nav.state.mode, NavMode::Stopped);
    }

    #[test]
    fn dead_remote_does_not_stall_the_tick() {
        let mut nav = started("F", NavConfig::default());
        nav.board.remote.fail_send = true;
        nav.board.remote.push("stop");
        run_for(&mut nav, Duration::from_millis(200));
        // the command itself still applied, the link is gone afterwards
        assert_eq!(nav.state.mode, NavMode::Stopped);
        assert!(!nav.board.remote.connected);

        nav.board.remote.push("start");
        run_for(&mut nav, Duration::from_millis(300));
        assert_eq!(nav.state.mode, NavMode::Stopped);
        assert_eq!(nav.board.remote.inbox.len(), 1);
    }
}
