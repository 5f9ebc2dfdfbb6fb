//! Fixed-step driver that ticks every agent against a shared engine.

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use shop_patrol_core::{Event, LineOfSightProbe, Perception};
use shop_patrol_system_agent::AgentStateMachine;
use shop_patrol_system_pathfinding::PathfindingEngine;
use tracing::{debug, info};

use crate::{scenario::Scenario, sight::GridSightProbe};

/// Player avatar walking a fixed list of waypoints and halting at the last.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Player {
    position: Vec2,
    waypoints: Vec<Vec2>,
    next: usize,
    speed: f32,
}

impl Player {
    pub(crate) fn new(position: Vec2, waypoints: Vec<Vec2>, speed: f32) -> Self {
        Self {
            position,
            waypoints,
            next: 0,
            speed,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    fn advance(&mut self, dt: Duration) {
        let Some(target) = self.waypoints.get(self.next).copied() else {
            return;
        };

        let step = self.speed * dt.as_secs_f32();
        let offset = target - self.position;
        if offset.length() <= step {
            self.position = target;
            self.next += 1;
        } else {
            self.position += offset.normalize_or_zero() * step;
        }
    }
}

/// Level state owned by the driver.
#[derive(Debug)]
pub(crate) struct Simulation {
    engine: PathfindingEngine,
    agents: Vec<AgentStateMachine>,
    player: Player,
    tick: u64,
}

impl Simulation {
    /// Builds the shared engine once and spawns every authored agent.
    pub(crate) fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let engine = PathfindingEngine::new(scenario.build_grid()?);
        Ok(Self {
            engine,
            agents: scenario.spawn_agents(),
            player: scenario.player(),
            tick: 0,
        })
    }

    /// Advances the player and then every agent by one fixed step.
    pub(crate) fn step(&mut self, dt: Duration, out: &mut Vec<Event>) {
        self.tick += 1;
        self.player.advance(dt);

        let first_new = out.len();
        let probe = GridSightProbe::new(self.engine.grid());
        let player_position = self.player.position();
        for agent in &mut self.agents {
            let perception = Perception {
                player_position,
                line_of_sight: probe
                    .has_line_of_sight(agent.position(), player_position - agent.position()),
            };
            agent.tick(dt, &perception, &self.engine, out);
        }

        for event in &out[first_new..] {
            match event {
                Event::StateChanged { agent, from, to } => {
                    info!(
                        tick = self.tick,
                        agent = agent.get(),
                        ?from,
                        ?to,
                        "agent changed state"
                    );
                }
                Event::AlertCue { agent } => {
                    info!(tick = self.tick, agent = agent.get(), "alert cue");
                }
                other => debug!(tick = self.tick, event = ?other, "agent event"),
            }
        }
    }

    pub(crate) fn agents(&self) -> &[AgentStateMachine] {
        &self.agents
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_patrol_core::AgentState;

    fn run(ticks: u32) -> (Vec<Event>, Vec<(AgentState, Vec2)>) {
        let scenario = Scenario::built_in().expect("built-in scenario");
        let mut simulation = Simulation::from_scenario(&scenario).expect("scenario builds");
        let mut events = Vec::new();
        for _ in 0..ticks {
            simulation.step(Duration::from_millis(16), &mut events);
        }
        let finals = simulation
            .agents()
            .iter()
            .map(|agent| (agent.state(), agent.position()))
            .collect();
        (events, finals)
    }

    #[test]
    fn replays_are_identical() {
        let first = run(3_000);
        let second = run(3_000);
        assert!(!first.0.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn player_halts_at_final_waypoint() {
        let mut player = Player::new(
            Vec2::ZERO,
            vec![Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            2.0,
        );
        for _ in 0..20 {
            player.advance(Duration::from_millis(100));
        }
        assert_eq!(player.position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn stationary_player_never_moves() {
        let mut player = Player::new(Vec2::new(3.0, 2.0), Vec::new(), 5.0);
        player.advance(Duration::from_secs(1));
        assert_eq!(player.position(), Vec2::new(3.0, 2.0));
    }

    #[test]
    fn step_counts_ticks() {
        let scenario = Scenario::built_in().expect("built-in scenario");
        let mut simulation = Simulation::from_scenario(&scenario).expect("scenario builds");
        let mut events = Vec::new();
        for _ in 0..10 {
            simulation.step(Duration::from_millis(16), &mut events);
        }
        assert_eq!(simulation.ticks(), 10);
        assert_eq!(simulation.agents().len(), 2);
    }
}
