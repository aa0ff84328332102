#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system choosing a greedy step toward the player for every cued enemy.

use candy_crawl_core::{Command, Direction, EnemyView, Event, Position};
use tracing::{debug, warn};

/// Picks the step an enemy at `enemy` takes toward `player`.
///
/// Horizontal movement wins whenever the columns differ. Sharing a column,
/// the enemy steps toward the player's row, falling back to south when the
/// rows match as well.
#[must_use]
pub fn choose_direction(enemy: Position, player: Position) -> Direction {
    if enemy.column() == player.column() {
        if player.row() > enemy.row() {
            Direction::North
        } else {
            Direction::South
        }
    } else if player.column() > enemy.column() {
        Direction::East
    } else {
        Direction::West
    }
}

/// Translates enemy cues into move commands.
#[derive(Debug, Default)]
pub struct EnemyTargeting;

impl EnemyTargeting {
    /// Creates a new targeting system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a [`Command::MoveEnemy`] for every [`Event::EnemyCued`] in `events`.
    ///
    /// Cues for enemies missing from `enemies` are dropped.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Position,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::EnemyCued { enemy } = event else {
                continue;
            };
            let Some(snapshot) = enemies.get(*enemy) else {
                warn!(enemy = enemy.get(), "cued enemy missing from view");
                continue;
            };
            let direction = choose_direction(snapshot.position, player);
            debug!(
                enemy = enemy.get(),
                ?direction,
                distance = snapshot.position.manhattan_distance(player),
                "enemy targets player"
            );
            out.push(Command::MoveEnemy {
                enemy: *enemy,
                direction,
            });
        }
    }
}
