#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Explicit simulation context tying the world to its systems.
//!
//! A [`Simulation`] owns the world, the pure systems and the seeded random
//! source. Collaborators drive it through three entry points:
//! [`Simulation::setup_scene`], [`Simulation::submit_intent`] and
//! [`Simulation::advance`]. Each call runs every resulting command to
//! completion before returning, so an enemy's cue and its move resolve before
//! the next enemy is cued.

pub mod config;

use std::{collections::VecDeque, time::Duration};

use candy_crawl_core::{
    BoardLayout, Command, Event, GameConfig, GenerationError, PlayerCarry, PlayerSnapshot,
    TurnPhase,
};
use candy_crawl_system_board_generation::generate_level;
use candy_crawl_system_enemy_targeting::EnemyTargeting;
use candy_crawl_system_turn_scheduler::TurnScheduler;
use candy_crawl_world::{self as world, query, World};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use thiserror::Error;
use tracing::{debug, info};

pub use config::ConfigError;

/// Failures raised while creating a simulation or setting up a level.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The configuration was refused.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The generator could not lay out the requested level.
    #[error("level generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Levels are numbered from one.
    #[error("level numbers start at 1")]
    InvalidLevel,
}

/// Single-threaded game session driven by its host loop.
#[derive(Debug)]
pub struct Simulation {
    config: GameConfig,
    rng: ChaCha8Rng,
    world: World,
    scheduler: TurnScheduler,
    targeting: EnemyTargeting,
    carry: PlayerCarry,
    events: Vec<Event>,
}

impl Simulation {
    /// Validates `config` and creates a session whose generator is seeded with `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        config::validate(&config)?;
        let carry = PlayerCarry::new(config.rules.starting_food, config.rules.starting_paper);
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            world: World::new(config.rules, config.pacing),
            scheduler: TurnScheduler::new(config.pacing),
            targeting: EnemyTargeting::new(),
            carry,
            events: Vec::new(),
            config,
        })
    }

    /// Generates and loads `level`, carrying food and paper over from the
    /// last completed level.
    pub fn setup_scene(&mut self, level: u32) -> Result<(), SetupError> {
        if level == 0 {
            return Err(SetupError::InvalidLevel);
        }
        let layout = generate_level(&self.config.board, level, &mut self.rng)?;
        info!(level, placements = layout.placements().len(), "scene set up");
        self.load_layout(level, layout, self.carry)
    }

    /// Loads a prepared layout, bypassing the generator.
    ///
    /// The layout's board must satisfy the same side limits as a configured one.
    pub fn load_layout(
        &mut self,
        level: u32,
        layout: BoardLayout,
        carry: PlayerCarry,
    ) -> Result<(), SetupError> {
        if level == 0 {
            return Err(SetupError::InvalidLevel);
        }
        let board = layout.board();
        let side = |value: i32| u32::try_from(value).unwrap_or(0);
        config::check_board(side(board.columns()), side(board.rows()))?;

        self.carry = carry;
        self.pump(Command::LoadLevel {
            level,
            layout,
            carry,
        });
        Ok(())
    }

    /// Delivers a player direction intent; anything but a legal cardinal step
    /// during the player's turn is ignored.
    pub fn submit_intent(&mut self, dx: i32, dy: i32) {
        self.pump(Command::MovePlayer { dx, dy });
    }

    /// Advances simulation time, firing every continuation that falls due.
    pub fn advance(&mut self, dt: Duration) {
        self.pump(Command::Tick { dt });
    }

    /// Runs a command and every follow-up it triggers, depth first.
    fn pump(&mut self, command: Command) {
        let mut pending = VecDeque::from([command]);
        let mut events = Vec::new();
        let mut follow_ups = Vec::new();

        while let Some(command) = pending.pop_front() {
            world::apply(&mut self.world, command, &mut events);

            let enemies = query::enemy_view(&self.world);
            let player = query::player(&self.world).position;
            self.targeting
                .handle(&events, &enemies, player, &mut follow_ups);
            self.scheduler.handle(&events, &enemies, &mut follow_ups);

            for event in &events {
                if let Event::LevelCompleted { level, carry } = event {
                    debug!(level, food = carry.food, paper = carry.paper, "carry stored");
                    self.carry = *carry;
                }
            }

            for follow_up in follow_ups.drain(..).rev() {
                pending.push_front(follow_up);
            }
            self.events.append(&mut events);
        }
    }

    /// Removes and returns every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Events produced since the last drain.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Phase currently gating actions.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        query::phase(&self.world)
    }

    /// Number of the loaded level, zero before the first scene.
    #[must_use]
    pub fn level(&self) -> u32 {
        query::level(&self.world)
    }

    /// Current player state.
    #[must_use]
    pub fn player(&self) -> PlayerSnapshot {
        query::player(&self.world)
    }

    /// Counters the next [`Simulation::setup_scene`] starts from.
    #[must_use]
    pub fn carry(&self) -> PlayerCarry {
        self.carry
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Time until the scheduler's next continuation, if any is pending.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    /// Reports whether the session reached a terminal game over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase() == TurnPhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candy_crawl_core::{Board, Position};

    #[test]
    fn level_zero_is_rejected() {
        let mut simulation =
            Simulation::new(GameConfig::default(), 1).expect("default config is valid");
        assert!(matches!(
            simulation.setup_scene(0),
            Err(SetupError::InvalidLevel)
        ));
    }

    #[test]
    fn invalid_config_is_refused_up_front() {
        let mut config = GameConfig::default();
        config.board.rows = 0;
        assert!(matches!(
            Simulation::new(config, 1),
            Err(SetupError::Config(ConfigError::BoardTooSmall { .. }))
        ));
    }

    #[test]
    fn oversized_layouts_are_refused_before_loading() {
        let mut simulation =
            Simulation::new(GameConfig::default(), 1).expect("default config is valid");
        let layout = BoardLayout::new(Board::new(i32::MAX, i32::MAX), Position::new(0, 0));
        assert!(matches!(
            simulation.load_layout(1, layout, PlayerCarry::new(10, 0)),
            Err(SetupError::Config(ConfigError::BoardTooLarge { .. }))
        ));
        assert_eq!(simulation.level(), 0);
        assert!(simulation.events().is_empty());

        let negative = BoardLayout::new(Board::new(-4, 6), Position::new(0, 0));
        assert!(matches!(
            simulation.load_layout(1, negative, PlayerCarry::new(10, 0)),
            Err(SetupError::Config(ConfigError::BoardTooSmall { columns: 0, rows: 6 }))
        ));
    }

    #[test]
    fn setup_scene_loads_the_generated_level() {
        let mut simulation =
            Simulation::new(GameConfig::default(), 9).expect("default config is valid");
        simulation.setup_scene(1).expect("level 1 generates");
        assert_eq!(simulation.level(), 1);
        assert_eq!(simulation.phase(), TurnPhase::Setup);
        assert_eq!(simulation.player().food, 100);
        assert!(simulation
            .events()
            .iter()
            .any(|event| matches!(event, Event::LevelLoaded { enemy_count: 0, .. })));
        assert_eq!(simulation.time_until_next(), Some(Duration::from_secs(2)));
    }
}
