#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that plays Candy Crawl from a scripted
//! input stream.
//!
//! The adapter stands in for the presentation, audio and input collaborators:
//! it feeds script steps to the simulation, drives the clock in fixed steps,
//! logs every notification and advances levels when the player escapes.

mod script;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use candy_crawl_core::{Event, GameConfig, TurnPhase};
use candy_crawl_simulation::{config, Simulation};
use clap::Parser;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use script::{parse_script, Step};

const DEFAULT_SCRIPT: &str = "RURURURURURURURURURURURURURURU";

/// Command-line arguments accepted by the headless runner.
#[derive(Debug, Parser)]
#[command(name = "candy-crawl", about = "Plays Candy Crawl headlessly from a move script")]
struct Args {
    /// TOML file overriding board, rules and pacing defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the level generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Moves to play: U, D, L, R, or `.` to wait one step.
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    script: String,
    /// Stop once this many levels have been completed.
    #[arg(long, default_value_t = 5)]
    max_levels: u32,
    /// Clock step in milliseconds.
    #[arg(long, default_value_t = 50)]
    step_ms: u64,
}

/// Why a headless session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Starved,
    LevelLimit,
    ScriptExhausted,
}

/// Entry point for the Candy Crawl command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<()> {
    let steps = parse_script(&args.script).context("invalid --script")?;
    let config = match &args.config {
        Some(path) => config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut simulation =
        Simulation::new(config, args.seed).context("failed to create simulation")?;
    simulation
        .setup_scene(1)
        .context("failed to set up the first level")?;
    let board = &simulation.config().board;
    info!(
        seed = args.seed,
        steps = steps.len(),
        columns = board.columns,
        rows = board.rows,
        "session started"
    );

    let step = Duration::from_millis(args.step_ms.max(1));
    let mut steps = steps.into_iter();
    let outcome = loop {
        report(&simulation.drain_events());

        if simulation.is_over() {
            break Outcome::Starved;
        }

        let player = simulation.player();
        if simulation.phase() == TurnPhase::Setup && !player.active {
            let next = simulation.level() + 1;
            if next > args.max_levels {
                break Outcome::LevelLimit;
            }
            simulation
                .setup_scene(next)
                .with_context(|| format!("failed to set up level {next}"))?;
            continue;
        }

        if simulation.phase() == TurnPhase::PlayerTurn && player.active && !player.in_transit {
            match steps.next() {
                Some(Step::Move { dx, dy }) => simulation.submit_intent(dx, dy),
                Some(Step::Wait) => simulation.advance(step),
                None => break Outcome::ScriptExhausted,
            }
            continue;
        }

        simulation.advance(step);
    };

    let player = simulation.player();
    let level = simulation.level();
    match outcome {
        Outcome::Starved => println!("Starved on day {level}."),
        Outcome::LevelLimit => println!(
            "Escaped day {level} with {} food and {} paper; level limit reached.",
            player.food, player.paper
        ),
        Outcome::ScriptExhausted => println!(
            "Script ended on day {level} with {} food and {} paper.",
            player.food, player.paper
        ),
    }
    Ok(())
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::LevelLoaded {
                level,
                board,
                enemy_count,
            } => info!(
                level,
                columns = board.columns(),
                rows = board.rows(),
                enemy_count,
                "day {level}"
            ),
            Event::ExitReached { level } => info!(level, "exit reached"),
            Event::LevelCompleted { level, carry } => {
                info!(level, food = carry.food, paper = carry.paper, "level completed");
            }
            Event::GameOver { level } => info!(level, "after {level} days, you starved"),
            Event::PlayerStatsChanged {
                food,
                paper,
                food_delta,
            } => debug!(food, paper, food_delta, "player stats"),
            Event::PhaseChanged { phase } => debug!(?phase, "phase"),
            Event::SoundCue { effect } => trace!(?effect, "sound"),
            Event::AnimationCue { entity, animation } => {
                trace!(entity = entity.get(), ?animation, "animation");
            }
            Event::TimeAdvanced { .. } | Event::TransitCompleted { .. } => {}
            other => debug!(?other, "notification"),
        }
    }
}
