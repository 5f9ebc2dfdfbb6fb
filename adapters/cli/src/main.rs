#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless shop patrol simulation.

mod scenario;
mod sight;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use shop_patrol_core::Event;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::{scenario::Scenario, simulation::Simulation};

#[derive(Debug, Parser)]
#[command(name = "shop-patrol", about = "Runs a headless shop patrol simulation")]
struct Cli {
    /// Scenario file to load instead of the built-in shop floor.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Number of fixed simulation steps to run.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Length of each step in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    dt_ms: u64,
    /// Log every agent event instead of only state changes.
    #[arg(long)]
    verbose: bool,
}

/// Entry point for the shop patrol command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::built_in()?,
    };
    let mut simulation = Simulation::from_scenario(&scenario)?;

    let dt = Duration::from_millis(cli.dt_ms);
    let mut events = Vec::new();
    let mut transitions = 0usize;
    for _ in 0..cli.ticks {
        events.clear();
        simulation.step(dt, &mut events);
        transitions += events
            .iter()
            .filter(|event| matches!(event, Event::StateChanged { .. }))
            .count();
    }

    println!(
        "ran {} ticks, {} state changes",
        simulation.ticks(),
        transitions
    );
    for agent in simulation.agents() {
        let position = agent.position();
        println!(
            "agent {}: {:?} at ({:.2}, {:.2}) heading {:.1} sees player {}",
            agent.id().get(),
            agent.state(),
            position.x,
            position.y,
            agent.heading_degrees(),
            agent.line_of_sight()
        );
    }
    let player = simulation.player().position();
    println!("player at ({:.2}, {:.2})", player.x, player.y);

    Ok(())
}
