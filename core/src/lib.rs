#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Candy Crawl simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{BoardConfig, CountRange, GameConfig, PacingConfig, RulesConfig};

/// Phase of the turn scheduler. Exactly one phase is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Level is being populated and the intro card is showing.
    Setup,
    /// The player may submit exactly one move attempt.
    PlayerTurn,
    /// Enemies act one at a time in registration order.
    EnemiesTurn,
    /// Terminal sink; nothing acts until the level is reloaded.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards all spatial state and populates a fresh level from a layout.
    LoadLevel {
        /// One-based level counter.
        level: u32,
        /// Generated board consumed once during setup.
        layout: BoardLayout,
        /// Player counters carried over from the previous level.
        carry: PlayerCarry,
    },
    /// Ends the setup phase and hands the first turn to the player.
    BeginLevel,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Raw directional intent delivered by the input collaborator.
    MovePlayer {
        /// Horizontal component of the intent.
        dx: i32,
        /// Vertical component of the intent.
        dy: i32,
    },
    /// Gives the identified enemy its slot in the current enemies turn.
    CueEnemy {
        /// Enemy whose turn it is.
        enemy: EntityId,
    },
    /// Requests that an enemy attempt a single step.
    MoveEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EntityId,
        /// Direction chosen by the targeting heuristic.
        direction: Direction,
    },
    /// Closes the enemies turn and returns control to the player.
    EndEnemiesTurn,
    /// Completes a level whose exit has been reached.
    AdvanceLevel,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a level finished populating.
    LevelLoaded {
        /// Level counter that was loaded.
        level: u32,
        /// Bounds of the freshly generated board.
        board: Board,
        /// Number of enemies registered for the level.
        enemy_count: usize,
    },
    /// Presentation notice that an entity now occupies a cell.
    EntitySpawned {
        /// Identifier assigned by the registry.
        entity: EntityId,
        /// Kind of entity that was spawned.
        kind: EntityKind,
        /// Cell the entity occupies.
        position: Position,
    },
    /// Announces that the turn scheduler entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: TurnPhase,
    },
    /// Confirms that an agent moved between two adjacent cells.
    AgentMoved {
        /// Agent that moved.
        entity: EntityId,
        /// Cell the agent occupied before moving.
        from: Position,
        /// Cell the agent occupies after moving.
        to: Position,
    },
    /// Reports that an agent ran into a blocker and stayed put.
    AgentBlocked {
        /// Agent whose move was blocked.
        entity: EntityId,
        /// Blocker occupying the destination.
        blocker: Blocker,
    },
    /// Reports that an agent refused a move because it was still in transit.
    AgentStalled {
        /// Agent that is still moving.
        entity: EntityId,
    },
    /// Confirms that an agent finished travelling to its destination cell.
    TransitCompleted {
        /// Agent whose transit completed.
        entity: EntityId,
    },
    /// Reports that a wall absorbed damage.
    WallDamaged {
        /// Wall that was hit.
        wall: EntityId,
        /// Hit points left after the hit.
        remaining: i32,
    },
    /// Confirms that an entity left the board.
    EntityRemoved {
        /// Entity that was removed.
        entity: EntityId,
    },
    /// Reports that the player spent paper on a house.
    HousePapered {
        /// House that was converted.
        house: EntityId,
        /// Food points granted.
        points: i32,
    },
    /// Reports that the player collected a pickup.
    PickupCollected {
        /// Pickup entity that was consumed.
        pickup: EntityId,
        /// Kind of pickup.
        kind: PickupKind,
    },
    /// Reports the player's counters after a change.
    PlayerStatsChanged {
        /// Current food value.
        food: i32,
        /// Current paper count.
        paper: u32,
        /// Signed change applied to food by the triggering action.
        food_delta: i32,
    },
    /// Reports that an enemy damaged the player.
    PlayerDamaged {
        /// Enemy that attacked.
        enemy: EntityId,
        /// Food points lost.
        amount: i32,
    },
    /// Confirms that an enemy received its turn slot.
    EnemyCued {
        /// Enemy whose turn began.
        enemy: EntityId,
    },
    /// Reports that an enemy sat out its turn.
    EnemyRested {
        /// Enemy that skipped.
        enemy: EntityId,
    },
    /// Announces that the player stepped onto the exit.
    ExitReached {
        /// Level whose exit was reached.
        level: u32,
    },
    /// Announces that the level is finished and the next one may be set up.
    LevelCompleted {
        /// Level that was completed.
        level: u32,
        /// Counters to carry into the next level.
        carry: PlayerCarry,
    },
    /// Terminal notification; the player ran out of food.
    GameOver {
        /// Level on which the player starved.
        level: u32,
    },
    /// Reports that an intent was absorbed without any state change.
    IntentIgnored {
        /// Why the intent had no effect.
        reason: IgnoredIntent,
    },
    /// Fire-and-forget audio notification.
    SoundCue {
        /// Effect the audio collaborator should play.
        effect: SoundEffect,
    },
    /// Fire-and-forget animation notification.
    AnimationCue {
        /// Entity that should animate.
        entity: EntityId,
        /// Animation trigger to play.
        animation: Animation,
    },
}

/// Reasons an intent may be absorbed by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoredIntent {
    /// The delta was zero or diagonal.
    InvalidDirection,
    /// The intent arrived outside the actor's phase.
    IllegalTurnAction(TurnPhase),
    /// The player already reached the exit and cannot act.
    PlayerInactive,
    /// The intent referenced an entity that is not a live enemy.
    UnknownAgent,
    /// The level layout's board lies outside the supported side limits.
    UnsupportedBoard(Board),
}

/// Audio effects requested from the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player moved a cell.
    Footstep,
    /// Player ate candy.
    Chew,
    /// Player drank soda.
    Drink,
    /// Player picked up paper.
    Rustle,
    /// Player hit a wall.
    Chop,
    /// Player papered a house.
    Raid,
    /// Enemy attacked the player.
    EnemyAttack,
    /// Player starved.
    GameOver,
}

/// Animation triggers requested from the presentation collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Animation {
    /// Entity performs its attack animation.
    Attack,
    /// Entity flinches after being hit.
    Hit,
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Converts a raw intent into a direction. Zero and diagonal deltas yield `None`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, -1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }

    /// Unit offset applied to a position when moving in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to an entity by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// Coordinates are signed because the impassable border ring sits at `-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    column: i32,
    row: i32,
}

impl Position {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.column + dx, self.row + dy)
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Smallest supported board side, in cells.
pub const MIN_BOARD_SIDE: u32 = 2;

/// Largest supported board side, in cells.
pub const MAX_BOARD_SIDE: u32 = 256;

/// Bounds of a playable board: `[0, columns) × [0, rows)` ringed by a border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    columns: i32,
    rows: i32,
}

impl Board {
    /// Creates a board description with the provided interior dimensions.
    #[must_use]
    pub const fn new(columns: i32, rows: i32) -> Self {
        Self { columns, rows }
    }

    /// Number of interior columns.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of interior rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Reports whether the position lies inside the traversable interior.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.column >= 0
            && position.column < self.columns
            && position.row >= 0
            && position.row < self.rows
    }

    /// Reports whether the position lies on the one-cell border ring.
    #[must_use]
    pub const fn is_border(&self, position: Position) -> bool {
        let within_ring = position.column >= -1
            && position.column <= self.columns
            && position.row >= -1
            && position.row <= self.rows;
        within_ring
            && (position.column == -1
                || position.column == self.columns
                || position.row == -1
                || position.row == self.rows)
    }

    /// Reports whether both sides lie within [`MIN_BOARD_SIDE`] and [`MAX_BOARD_SIDE`].
    #[must_use]
    pub fn is_supported(&self) -> bool {
        let supported = |side: i32| {
            u32::try_from(side).is_ok_and(|side| (MIN_BOARD_SIDE..=MAX_BOARD_SIDE).contains(&side))
        };
        supported(self.columns) && supported(self.rows)
    }

    /// Top-right interior corner where the exit is placed.
    #[must_use]
    pub const fn exit_cell(&self) -> Position {
        Position::new(self.columns - 1, self.rows - 1)
    }
}

/// Enemy variants available to the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow-witted enemy with the lower base damage.
    Zombie,
    /// Hard-hitting enemy with the higher base damage.
    Vampire,
}

/// Obstacle variants placed by the obstacle generation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Destructible wall with hit points.
    Wall,
    /// House that can be papered for points.
    House,
}

/// Item variants placed by the pickup generation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores a small amount of food.
    Candy,
    /// Restores a larger amount of food.
    Soda,
    /// Adds one roll of paper to the consumable count.
    Paper,
}

/// Closed set of live entity kinds, matched exhaustively for contact dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The single player agent.
    Player,
    /// A hostile agent.
    Enemy(EnemyKind),
    /// Destructible wall.
    Wall,
    /// House obstacle.
    House,
    /// Consumable item.
    Pickup(PickupKind),
    /// Level exit marker.
    Exit,
}

/// Generation-time classification of a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable border ring cell.
    Border,
    /// Plain traversable floor.
    Floor,
    /// Obstacle placed from the position pool.
    Obstacle(ObstacleKind),
    /// Pickup placed from the position pool.
    Pickup(PickupKind),
    /// Enemy spawn placed from the position pool.
    EnemySpawn(EnemyKind),
    /// Exit marker at the top-right interior corner.
    Exit,
}

/// Tile classification anchored at a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardTile {
    /// Cell the tile occupies.
    pub position: Position,
    /// Classification of the cell.
    pub tile: Tile,
}

impl BoardTile {
    /// Creates a new tile at the provided position.
    #[must_use]
    pub const fn new(position: Position, tile: Tile) -> Self {
        Self { position, tile }
    }
}

/// Product of procedural generation, consumed once by [`Command::LoadLevel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    board: Board,
    player_start: Position,
    ground: Vec<BoardTile>,
    placements: Vec<BoardTile>,
}

impl BoardLayout {
    /// Creates a layout with no ground tiles and no placements.
    #[must_use]
    pub fn new(board: Board, player_start: Position) -> Self {
        Self {
            board,
            player_start,
            ground: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// Replaces the border and floor tiles of the layout.
    #[must_use]
    pub fn with_ground(mut self, ground: Vec<BoardTile>) -> Self {
        self.ground = ground;
        self
    }

    /// Appends a feature placement to the layout.
    #[must_use]
    pub fn with_placement(mut self, position: Position, tile: Tile) -> Self {
        self.placements.push(BoardTile::new(position, tile));
        self
    }

    /// Appends a feature placement in place.
    pub fn push_placement(&mut self, placement: BoardTile) {
        self.placements.push(placement);
    }

    /// Bounds of the generated board.
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// Cell where the player begins the level.
    #[must_use]
    pub const fn player_start(&self) -> Position {
        self.player_start
    }

    /// Border and floor tiles covering `[-1, columns] × [-1, rows]`.
    #[must_use]
    pub fn ground(&self) -> &[BoardTile] {
        &self.ground
    }

    /// Obstacles, pickups, enemy spawns and the exit in placement order.
    #[must_use]
    pub fn placements(&self) -> &[BoardTile] {
        &self.placements
    }
}

/// Player counters that survive a level transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerCarry {
    /// Food points; the player starves at zero or below.
    pub food: i32,
    /// Consumable paper rolls.
    pub paper: u32,
}

impl PlayerCarry {
    /// Creates a carry record from explicit counters.
    #[must_use]
    pub const fn new(food: i32, paper: u32) -> Self {
        Self { food, paper }
    }
}

/// Entity that stood in the way of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Blocker {
    /// The impassable border ring.
    Border(Position),
    /// A live entity on the blocking layer.
    Entity {
        /// Identifier of the blocking entity.
        id: EntityId,
        /// Kind of the blocking entity.
        kind: EntityKind,
    },
}

/// Result of a single movement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The agent now occupies the destination cell.
    Moved(Position),
    /// The destination is occupied; the agent did not move.
    Blocked(Blocker),
    /// The agent is still in transit from its previous step and refused the attempt.
    Stalled,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Identifier assigned to the player.
    pub id: EntityId,
    /// Cell currently occupied by the player.
    pub position: Position,
    /// Current food value.
    pub food: i32,
    /// Current paper count.
    pub paper: u32,
    /// Indicates whether a step is still in progress.
    pub in_transit: bool,
    /// False once the player reached the exit.
    pub active: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EntityId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Cell currently occupied by the enemy.
    pub position: Position,
    /// Time the enemy needs to complete one step.
    pub move_duration: Duration,
    /// Indicates whether the enemy sits out its next cue.
    pub rests_next_turn: bool,
}

/// Read-only snapshot describing all enemies in registration order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the provided enemy.
    #[must_use]
    pub fn get(&self, enemy: EntityId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Failures raised while generating a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// More placements were requested than interior cells remain.
    #[error("position pool exhausted: requested {requested} cells but only {remaining} remain")]
    PoolExhausted {
        /// Number of cells the call tried to draw.
        requested: u32,
        /// Number of cells left in the pool.
        remaining: u32,
    },
    /// A placement call was given no variants to pick from.
    #[error("no variants to place")]
    NoVariants,
    /// A count range had its bounds inverted.
    #[error("invalid count range: minimum {minimum} exceeds maximum {maximum}")]
    InvalidRange {
        /// Lower bound supplied.
        minimum: u32,
        /// Upper bound supplied.
        maximum: u32,
    },
}
