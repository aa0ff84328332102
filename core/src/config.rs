//! Tuning knobs for generation, combat rules and turn pacing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EnemyKind, PickupKind};

/// Aggregated configuration for a complete game session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board dimensions and placement counts.
    pub board: BoardConfig,
    /// Combat and pickup constants.
    pub rules: RulesConfig,
    /// Delays driving the turn scheduler.
    pub pacing: PacingConfig,
}

/// Inclusive integer range sampled uniformly by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountRange {
    /// Smallest count that may be drawn.
    pub minimum: u32,
    /// Largest count that may be drawn.
    pub maximum: u32,
}

impl CountRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(minimum: u32, maximum: u32) -> Self {
        Self { minimum, maximum }
    }

    /// Range that always yields exactly `count`.
    #[must_use]
    pub const fn exactly(count: u32) -> Self {
        Self::new(count, count)
    }
}

/// Board dimensions and the number of features scattered over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Interior columns of the board.
    pub columns: u32,
    /// Interior rows of the board.
    pub rows: u32,
    /// How many walls and houses are drawn from the pool.
    pub obstacle_count: CountRange,
    /// How many candy, soda and paper pickups are drawn from the pool.
    pub pickup_count: CountRange,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            obstacle_count: CountRange::new(5, 9),
            pickup_count: CountRange::new(1, 5),
        }
    }
}

/// Combat, pickup and starting constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Food the player starts the first level with.
    pub starting_food: i32,
    /// Paper rolls the player starts the first level with.
    pub starting_paper: u32,
    /// Food consumed by every accepted move attempt.
    pub food_per_move: i32,
    /// Hit points of a freshly placed wall.
    pub wall_hit_points: i32,
    /// Damage the player deals to a wall per attack.
    pub wall_damage: i32,
    /// Food granted by a candy pickup.
    pub points_per_candy: i32,
    /// Food granted by a soda pickup.
    pub points_per_soda: i32,
    /// Food granted by papering a house.
    pub points_per_house: i32,
    /// Base damage of a zombie before level scaling.
    pub zombie_damage: i32,
    /// Base damage of a vampire before level scaling.
    pub vampire_damage: i32,
}

impl RulesConfig {
    /// Damage an enemy of `kind` deals on `level`: base damage plus `level - 1`.
    #[must_use]
    pub fn enemy_damage(&self, kind: EnemyKind, level: u32) -> i32 {
        let base = match kind {
            EnemyKind::Zombie => self.zombie_damage,
            EnemyKind::Vampire => self.vampire_damage,
        };
        let scaling = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        base.saturating_add(scaling)
    }

    /// Food granted by a pickup; paper grants no food.
    #[must_use]
    pub const fn pickup_food(&self, kind: PickupKind) -> i32 {
        match kind {
            PickupKind::Candy => self.points_per_candy,
            PickupKind::Soda => self.points_per_soda,
            PickupKind::Paper => 0,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_food: 100,
            starting_paper: 0,
            food_per_move: 1,
            wall_hit_points: 2,
            wall_damage: 1,
            points_per_candy: 10,
            points_per_soda: 20,
            points_per_house: 100,
            zombie_damage: 10,
            vampire_damage: 20,
        }
    }
}

/// Delays, in milliseconds, that pace the turn scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Intro card duration before the first player turn.
    pub level_start_delay_ms: u64,
    /// Baseline pause opening every enemies turn.
    pub turn_delay_ms: u64,
    /// Time the player needs to complete one step.
    pub player_move_ms: u64,
    /// Time a zombie needs to complete one step.
    pub zombie_move_ms: u64,
    /// Time a vampire needs to complete one step.
    pub vampire_move_ms: u64,
    /// Pause between reaching the exit and completing the level.
    pub restart_delay_ms: u64,
}

impl PacingConfig {
    /// Intro card duration.
    #[must_use]
    pub const fn level_start_delay(&self) -> Duration {
        Duration::from_millis(self.level_start_delay_ms)
    }

    /// Baseline enemies-turn pause.
    #[must_use]
    pub const fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    /// Player step duration.
    #[must_use]
    pub const fn player_move_duration(&self) -> Duration {
        Duration::from_millis(self.player_move_ms)
    }

    /// Step duration for an enemy of `kind`.
    #[must_use]
    pub const fn enemy_move_duration(&self, kind: EnemyKind) -> Duration {
        match kind {
            EnemyKind::Zombie => Duration::from_millis(self.zombie_move_ms),
            EnemyKind::Vampire => Duration::from_millis(self.vampire_move_ms),
        }
    }

    /// Pause before the level-advance fires.
    #[must_use]
    pub const fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            level_start_delay_ms: 2_000,
            turn_delay_ms: 100,
            player_move_ms: 100,
            zombie_move_ms: 100,
            vampire_move_ms: 100,
            restart_delay_ms: 1_000,
        }
    }
}
