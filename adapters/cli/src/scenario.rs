//! Scenario files describing a shop floor, its patrollers and the player.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use serde::Deserialize;
use shop_patrol_core::{AgentId, CellRect};
use shop_patrol_system_agent::{AgentStateMachine, Config, PatrolRoute};
use shop_patrol_world::{GridIndex, ShopLayout};

use crate::simulation::Player;

const BUILT_IN_SCENARIO: &str = include_str!("../scenarios/shop.toml");

/// Level setup loaded from TOML.
///
/// Omitting `[[blocked]]` means the default shelf rows, which need a grid at
/// least 14 columns wide and 6 rows tall. An explicit empty list
/// (`blocked = []`) gives an open floor.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Scenario {
    grid: GridSection,
    #[serde(default)]
    blocked: Option<Vec<CellRect>>,
    #[serde(default)]
    agents: Vec<AgentSection>,
    player: PlayerSection,
}

#[derive(Clone, Debug, Deserialize)]
struct GridSection {
    width: u32,
    height: u32,
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    #[serde(default)]
    origin: Vec2,
}

#[derive(Clone, Debug, Deserialize)]
struct AgentSection {
    position: Vec2,
    #[serde(default)]
    patrol: Vec<Vec2>,
    #[serde(default)]
    stopping_points: Vec<Vec2>,
    #[serde(default)]
    config: Config,
}

#[derive(Clone, Debug, Deserialize)]
struct PlayerSection {
    position: Vec2,
    #[serde(default)]
    waypoints: Vec<Vec2>,
    #[serde(default = "default_player_speed")]
    speed: f32,
}

fn default_cell_size() -> f32 {
    1.0
}

fn default_player_speed() -> f32 {
    1.0
}

fn check_speed(name: &str, speed: f32) -> Result<()> {
    if !speed.is_finite() || speed < 0.0 {
        bail!("{name} {speed} must be finite and non-negative");
    }
    Ok(())
}

impl Scenario {
    /// Scenario shipped with the binary.
    pub(crate) fn built_in() -> Result<Self> {
        Self::parse(BUILT_IN_SCENARIO).context("built-in scenario is invalid")
    }

    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid scenario at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        check_speed("player speed", scenario.player.speed)?;
        for (index, agent) in scenario.agents.iter().enumerate() {
            let config = &agent.config;
            for (name, speed) in [
                ("shopping_speed", config.shopping_speed),
                ("investigate_speed", config.investigate_speed),
                ("chase_speed", config.chase_speed),
                ("return_speed", config.return_speed),
            ] {
                check_speed(name, speed)
                    .with_context(|| format!("invalid config for agent {index}"))?;
            }
        }
        Ok(scenario)
    }

    /// Blocked regions, falling back to the default shelves when none are authored.
    pub(crate) fn layout(&self) -> ShopLayout {
        match &self.blocked {
            Some(blocked) => ShopLayout::new(blocked.clone()),
            None => ShopLayout::default_shelves(),
        }
    }

    /// Builds the walkability grid with the scenario's blocked regions applied.
    pub(crate) fn build_grid(&self) -> Result<GridIndex> {
        let mut grid = GridIndex::create(
            self.grid.width,
            self.grid.height,
            self.grid.cell_size,
            self.grid.origin,
        )
        .context("invalid [grid] section")?;
        let context = if self.blocked.is_some() {
            "blocked region does not fit the grid"
        } else {
            "default shelves do not fit the grid; add [[blocked]] entries to replace them"
        };
        self.layout().apply_to(&mut grid).context(context)?;
        Ok(grid)
    }

    /// Spawns one state machine per `[[agents]]` entry, numbered in file order.
    pub(crate) fn spawn_agents(&self) -> Vec<AgentStateMachine> {
        (0u32..)
            .zip(&self.agents)
            .map(|(id, agent)| {
                let route = PatrolRoute::new(agent.patrol.clone())
                    .with_stopping_points(agent.stopping_points.clone());
                AgentStateMachine::new(AgentId::new(id), agent.position, route, agent.config)
            })
            .collect()
    }

    pub(crate) fn player(&self) -> Player {
        Player::new(
            self.player.position,
            self.player.waypoints.clone(),
            self.player.speed,
        )
    }
}
