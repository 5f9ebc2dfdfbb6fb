#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-agent behaviour state machine for shop patrollers.
//!
//! An external driver calls [`AgentStateMachine::tick`] once per agent per
//! simulation step. Each tick does one bounded unit of work (a movement step,
//! a rotation increment, or a state-entry action) and reports its side effects
//! as [`Event`] values. Routes come from the injected [`PathPlanner`], which
//! the driver constructs once at level setup.

mod config;
mod look_around;
mod route;

use std::time::Duration;

use glam::Vec2;
use shop_patrol_core::{
    AgentId, AgentState, Event, PathOutcome, PathPlanner, Perception, WaypointPath,
};
use tracing::{debug, warn};

pub use crate::config::Config;
pub use crate::route::PatrolRoute;

use crate::look_around::{LookAround, ENTRY_TURN};

/// Player distance under which an agent notices the player.
pub const DETECTION_RADIUS: f32 = 3.0;
/// Distance at which a patrol point counts as reached.
pub const PATROL_ARRIVAL_DISTANCE: f32 = 0.01;
/// Distance at which a path waypoint counts as reached.
pub const WAYPOINT_ARRIVAL_DISTANCE: f32 = 0.5;
/// Player distance beyond which an investigation is abandoned.
pub const GIVE_UP_DISTANCE: f32 = 2.5;
/// Distance at which a stopping point triggers a look-around.
pub const STOPPING_POINT_RADIUS: f32 = 0.1;
/// Pause held while alerted before investigating.
pub const ALERT_PAUSE: Duration = Duration::from_millis(500);

/// Progress reported while following the cached path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PathProgress {
    NoPath,
    Travelling,
    Exhausted,
}

/// Behaviour state and movement bookkeeping for a single agent.
#[derive(Clone, Debug)]
pub struct AgentStateMachine {
    id: AgentId,
    config: Config,
    patrol: PatrolRoute,
    state: AgentState,
    entry_pending: bool,
    position: Vec2,
    heading_tenths: i32,
    patrol_index: usize,
    waypoint_index: usize,
    path: Option<WaypointPath>,
    line_of_sight: bool,
    target: Option<Vec2>,
    alert_elapsed: Duration,
    look_around: LookAround,
    last_stopping_point: Option<usize>,
}

impl AgentStateMachine {
    /// Spawns an agent in the shopping state with no cached path.
    #[must_use]
    pub fn new(id: AgentId, position: Vec2, patrol: PatrolRoute, config: Config) -> Self {
        Self {
            id,
            config,
            patrol,
            state: AgentState::Shopping,
            entry_pending: false,
            position,
            heading_tenths: 0,
            patrol_index: 0,
            waypoint_index: 0,
            path: None,
            line_of_sight: false,
            target: None,
            alert_elapsed: Duration::ZERO,
            look_around: LookAround::new(),
            last_stopping_point: None,
        }
    }

    /// Identifier of the agent.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Active behaviour state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Facing, in degrees, relative to the spawn orientation.
    #[must_use]
    pub fn heading_degrees(&self) -> f32 {
        self.heading_tenths as f32 / 10.0
    }

    /// Index of the patrol point the agent walks toward.
    #[must_use]
    pub const fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    /// Index of the cached path waypoint the agent walks toward.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// Most recently planned path, if it has not been consumed.
    #[must_use]
    pub fn path(&self) -> Option<&WaypointPath> {
        self.path.as_ref()
    }

    /// Line-of-sight signal observed on the latest tick.
    #[must_use]
    pub const fn line_of_sight(&self) -> bool {
        self.line_of_sight
    }

    /// Target of the most recent path request.
    #[must_use]
    pub const fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Authored patrol data.
    #[must_use]
    pub fn patrol(&self) -> &PatrolRoute {
        &self.patrol
    }

    /// Advances the agent by one simulation step.
    pub fn tick<P>(
        &mut self,
        dt: Duration,
        perception: &Perception,
        planner: &P,
        out: &mut Vec<Event>,
    ) where
        P: PathPlanner + ?Sized,
    {
        self.line_of_sight = perception.line_of_sight;

        if self.entry_pending {
            self.entry_pending = false;
            self.enter_state(perception, planner, out);
            return;
        }

        match self.state {
            AgentState::Shopping => self.shop(dt, perception, out),
            AgentState::ShoppingStopped => self.look(out),
            AgentState::Alerted => self.wait_alerted(dt, out),
            AgentState::Investigating => self.investigate(dt, perception, out),
            AgentState::Returning => self.return_to_patrol(dt, perception, out),
            AgentState::Chasing => self.chase(dt, perception, planner, out),
            AgentState::Stunned | AgentState::Smelling => {}
        }
    }

    fn enter_state<P>(&mut self, perception: &Perception, planner: &P, out: &mut Vec<Event>)
    where
        P: PathPlanner + ?Sized,
    {
        match self.state {
            AgentState::Alerted => {
                out.push(Event::AlertCue { agent: self.id });
                self.request_path(perception.player_position, planner, out);
                self.alert_elapsed = Duration::ZERO;
            }
            AgentState::Returning => match self.patrol.points().first().copied() {
                Some(home) => self.request_path(home, planner, out),
                None => self.transition(AgentState::Shopping, out),
            },
            AgentState::ShoppingStopped => {
                self.heading_tenths += ENTRY_TURN;
                self.look_around = LookAround::new();
            }
            _ => {}
        }
    }

    fn shop(&mut self, dt: Duration, perception: &Perception, out: &mut Vec<Event>) {
        let Some(target) = self.patrol.points().get(self.patrol_index).copied() else {
            return;
        };

        self.position = move_towards(
            self.position,
            target,
            self.config.shopping_speed * dt.as_secs_f32(),
        );

        if self.position.distance(perception.player_position) < DETECTION_RADIUS {
            let next = if perception.line_of_sight {
                AgentState::Chasing
            } else {
                AgentState::Alerted
            };
            self.transition(next, out);
            return;
        }

        if self.config.stop_at_stopping_points {
            self.check_stopping_points(out);
        }

        if self.position.distance(target) < PATROL_ARRIVAL_DISTANCE {
            self.patrol_index = (self.patrol_index + 1) % self.patrol.points().len();
            out.push(Event::PatrolAdvanced {
                agent: self.id,
                index: self.patrol_index,
            });
        }
    }

    fn check_stopping_points(&mut self, out: &mut Vec<Event>) {
        let reached = self
            .patrol
            .stopping_points()
            .iter()
            .position(|point| self.position.distance(*point) < STOPPING_POINT_RADIUS);

        if let Some(index) = reached {
            if self.last_stopping_point != Some(index) {
                self.last_stopping_point = Some(index);
                self.transition(AgentState::ShoppingStopped, out);
            }
        }
    }

    fn look(&mut self, out: &mut Vec<Event>) {
        if let Some(delta) = self.look_around.step() {
            self.heading_tenths += delta;
        }
        if self.look_around.is_finished() {
            self.transition(AgentState::Shopping, out);
        }
    }

    fn wait_alerted(&mut self, dt: Duration, out: &mut Vec<Event>) {
        self.alert_elapsed = self.alert_elapsed.saturating_add(dt);
        if self.alert_elapsed >= ALERT_PAUSE {
            self.transition(AgentState::Investigating, out);
        }
    }

    fn investigate(&mut self, dt: Duration, perception: &Perception, out: &mut Vec<Event>) {
        if self.sees_player_nearby(perception) {
            self.transition(AgentState::Chasing, out);
            return;
        }

        if self.follow_path(self.config.investigate_speed, dt) == PathProgress::Exhausted {
            self.path = None;
            let distance = self.position.distance(perception.player_position);
            if distance > GIVE_UP_DISTANCE || !perception.line_of_sight {
                self.transition(AgentState::Returning, out);
            }
        }
    }

    fn return_to_patrol(&mut self, dt: Duration, perception: &Perception, out: &mut Vec<Event>) {
        if self.sees_player_nearby(perception) {
            self.transition(AgentState::Chasing, out);
            return;
        }

        if self.follow_path(self.config.return_speed, dt) == PathProgress::Exhausted {
            self.path = None;
            self.patrol_index = 0;
            self.transition(AgentState::Shopping, out);
        }
    }

    fn chase<P>(&mut self, dt: Duration, perception: &Perception, planner: &P, out: &mut Vec<Event>)
    where
        P: PathPlanner + ?Sized,
    {
        if self.sees_player_nearby(perception) {
            self.position = move_towards(
                self.position,
                perception.player_position,
                self.config.chase_speed * dt.as_secs_f32(),
            );
        } else if !perception.line_of_sight {
            self.request_path(perception.player_position, planner, out);
            self.transition(AgentState::Investigating, out);
        }
    }

    /// Steps toward the current waypoint, or advances past it once reached.
    fn follow_path(&mut self, speed: f32, dt: Duration) -> PathProgress {
        let Some(path) = self.path.as_ref() else {
            return PathProgress::NoPath;
        };
        let Some(waypoint) = path.get(self.waypoint_index) else {
            return PathProgress::Exhausted;
        };

        if self.position.distance(waypoint) > WAYPOINT_ARRIVAL_DISTANCE {
            self.position = move_towards(self.position, waypoint, speed * dt.as_secs_f32());
            return PathProgress::Travelling;
        }

        self.waypoint_index += 1;
        if self.waypoint_index >= path.len() {
            PathProgress::Exhausted
        } else {
            PathProgress::Travelling
        }
    }

    fn sees_player_nearby(&self, perception: &Perception) -> bool {
        self.position.distance(perception.player_position) < DETECTION_RADIUS
            && perception.line_of_sight
    }

    fn request_path<P>(&mut self, target: Vec2, planner: &P, out: &mut Vec<Event>)
    where
        P: PathPlanner + ?Sized,
    {
        self.waypoint_index = 0;
        self.target = Some(target);

        let outcome = match planner.find_path(self.position, target) {
            Ok(Some(path)) => {
                let waypoints = path.len();
                self.path = Some(path);
                PathOutcome::Found { waypoints }
            }
            Ok(None) => {
                self.path = None;
                PathOutcome::NotFound
            }
            Err(error) => {
                warn!(agent = self.id.get(), %error, "path request rejected");
                self.path = None;
                PathOutcome::Rejected
            }
        };

        out.push(Event::PathRequested {
            agent: self.id,
            target,
            outcome,
        });
    }

    fn transition(&mut self, next: AgentState, out: &mut Vec<Event>) {
        let from = self.state;
        debug!(agent = self.id.get(), ?from, to = ?next, "state changed");

        self.state = next;
        self.entry_pending = matches!(
            next,
            AgentState::Alerted | AgentState::Returning | AgentState::ShoppingStopped
        );
        out.push(Event::StateChanged {
            agent: self.id,
            from,
            to: next,
        });
    }
}

/// Moves `current` toward `target` by at most `max_delta`, never overshooting.
fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + offset / distance * max_delta
    }
}
