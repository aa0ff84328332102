#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural board generation producing collision-free level layouts.
//!
//! Every feature is drawn from a single shrinking [`PositionPool`], so two
//! generated features never share a cell. The pool skips the outermost
//! interior ring, which keeps the player start and the exit corner reachable.

use candy_crawl_core::{
    Board, BoardConfig, BoardLayout, BoardTile, CountRange, EnemyKind, GenerationError,
    ObstacleKind, PickupKind, Position, Tile,
};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

const OBSTACLES: [ObstacleKind; 2] = [ObstacleKind::Wall, ObstacleKind::House];
const PICKUPS: [PickupKind; 3] = [PickupKind::Candy, PickupKind::Soda, PickupKind::Paper];
const ENEMIES: [EnemyKind; 2] = [EnemyKind::Zombie, EnemyKind::Vampire];

/// Cell where the player begins every level.
pub const PLAYER_START: Position = Position::new(0, 0);

/// Builds the ground layer over `[-1, columns] × [-1, rows]`.
///
/// The outer ring is [`Tile::Border`]; everything inside is [`Tile::Floor`].
#[must_use]
pub fn generate_board(columns: i32, rows: i32) -> Vec<BoardTile> {
    let board = Board::new(columns, rows);
    let width = usize::try_from(columns.saturating_add(2)).unwrap_or(0);
    let height = usize::try_from(rows.saturating_add(2)).unwrap_or(0);
    let mut tiles = Vec::with_capacity(width.saturating_mul(height));

    for column in -1..=columns {
        for row in -1..=rows {
            let position = Position::new(column, row);
            let tile = if board.is_border(position) {
                Tile::Border
            } else {
                Tile::Floor
            };
            tiles.push(BoardTile::new(position, tile));
        }
    }

    tiles
}

/// Number of cells a pool for the given dimensions starts with.
#[must_use]
pub fn pool_capacity(columns: u32, rows: u32) -> u32 {
    columns
        .saturating_sub(2)
        .saturating_mul(rows.saturating_sub(2))
}

/// Enemies placed on `level`: `floor(log2(level))`, zero for level 0 and 1.
#[must_use]
pub fn enemy_count_for_level(level: u32) -> u32 {
    level.checked_ilog2().unwrap_or(0)
}

/// Interior cells still eligible for random placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionPool {
    cells: Vec<Position>,
}

impl PositionPool {
    /// Enumerates every cell in `[1, columns-2] × [1, rows-2]`.
    #[must_use]
    pub fn new(columns: i32, rows: i32) -> Self {
        let mut cells = Vec::new();
        for column in 1..columns.saturating_sub(1) {
            for row in 1..rows.saturating_sub(1) {
                cells.push(Position::new(column, row));
            }
        }
        Self { cells }
    }

    /// Number of cells left to draw.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether every cell has been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the cell is still available.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Removes and returns a uniformly chosen remaining cell.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Position, GenerationError> {
        if self.cells.is_empty() {
            return Err(GenerationError::PoolExhausted {
                requested: 1,
                remaining: 0,
            });
        }
        let index = rng.gen_range(0..self.cells.len());
        Ok(self.cells.swap_remove(index))
    }

    fn remaining(&self) -> u32 {
        u32::try_from(self.cells.len()).unwrap_or(u32::MAX)
    }
}

/// Draws a count from `count`, then that many cells, pairing each with a
/// variant picked uniformly from `variants`.
///
/// The count is checked against the pool before anything is drawn, so a
/// failing call leaves the pool untouched.
pub fn place_random<T: Copy, R: Rng + ?Sized>(
    variants: &[T],
    count: CountRange,
    pool: &mut PositionPool,
    rng: &mut R,
) -> Result<Vec<(Position, T)>, GenerationError> {
    if count.minimum > count.maximum {
        return Err(GenerationError::InvalidRange {
            minimum: count.minimum,
            maximum: count.maximum,
        });
    }
    if variants.is_empty() {
        return Err(GenerationError::NoVariants);
    }
    let requested = rng.gen_range(count.minimum..=count.maximum);
    let remaining = pool.remaining();
    if requested > remaining {
        return Err(GenerationError::PoolExhausted {
            requested,
            remaining,
        });
    }

    let mut placed = Vec::with_capacity(usize::try_from(requested).unwrap_or(0));
    for _ in 0..requested {
        let position = pool.draw(rng)?;
        if let Some(&variant) = variants.choose(rng) {
            placed.push((position, variant));
        }
    }
    Ok(placed)
}

/// Generates the complete layout for `level`.
///
/// Obstacles are placed first, then pickups, then enemies, all from the same
/// pool; the exit always sits on the top-right interior corner.
pub fn generate_level<R: Rng + ?Sized>(
    config: &BoardConfig,
    level: u32,
    rng: &mut R,
) -> Result<BoardLayout, GenerationError> {
    let columns = i32::try_from(config.columns).unwrap_or(i32::MAX);
    let rows = i32::try_from(config.rows).unwrap_or(i32::MAX);
    let board = Board::new(columns, rows);
    let mut pool = PositionPool::new(columns, rows);
    let mut layout = BoardLayout::new(board, PLAYER_START).with_ground(generate_board(columns, rows));

    let obstacles = place_random(&OBSTACLES, config.obstacle_count, &mut pool, rng)?;
    let pickups = place_random(&PICKUPS, config.pickup_count, &mut pool, rng)?;
    let enemy_count = enemy_count_for_level(level);
    let enemies = place_random(&ENEMIES, CountRange::exactly(enemy_count), &mut pool, rng)?;

    debug!(
        level,
        obstacles = obstacles.len(),
        pickups = pickups.len(),
        enemies = enemies.len(),
        remaining = pool.len(),
        "board generated"
    );

    for (position, kind) in obstacles {
        layout.push_placement(BoardTile::new(position, Tile::Obstacle(kind)));
    }
    for (position, kind) in pickups {
        layout.push_placement(BoardTile::new(position, Tile::Pickup(kind)));
    }
    for (position, kind) in enemies {
        layout.push_placement(BoardTile::new(position, Tile::EnemySpawn(kind)));
    }
    layout.push_placement(BoardTile::new(board.exit_cell(), Tile::Exit));

    Ok(layout)
}
