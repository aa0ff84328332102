//! Authoritative entity state and identifier allocation.

use std::{collections::BTreeMap, time::Duration};

use candy_crawl_core::{
    EnemyKind, EnemySnapshot, EntityId, EntityKind, PickupKind, PlayerCarry, PlayerSnapshot,
    Position,
};

use crate::movement::Movable;

/// Progress of a single discrete step that has not finished yet.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Transit {
    remaining: Option<Duration>,
}

impl Transit {
    pub(crate) fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    fn begin(&mut self, duration: Duration) {
        self.remaining = if duration.is_zero() {
            None
        } else {
            Some(duration)
        };
    }

    /// Advances the transit clock, reporting whether the step just completed.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let left = remaining.saturating_sub(dt);
        if left.is_zero() {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }
}

/// Mutable state of the player agent.
#[derive(Clone, Debug)]
pub(crate) struct PlayerState {
    pub(crate) id: EntityId,
    pub(crate) position: Position,
    pub(crate) food: i32,
    pub(crate) paper: u32,
    pub(crate) active: bool,
    pub(crate) transit: Transit,
    move_duration: Duration,
}

impl PlayerState {
    pub(crate) fn new(
        id: EntityId,
        position: Position,
        carry: PlayerCarry,
        move_duration: Duration,
    ) -> Self {
        Self {
            id,
            position,
            food: carry.food,
            paper: carry.paper,
            active: true,
            transit: Transit::default(),
            move_duration,
        }
    }

    pub(crate) fn carry(&self) -> PlayerCarry {
        PlayerCarry::new(self.food, self.paper)
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            position: self.position,
            food: self.food,
            paper: self.paper,
            in_transit: self.transit.is_active(),
            active: self.active,
        }
    }
}

impl Movable for PlayerState {
    fn entity(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn in_transit(&self) -> bool {
        self.transit.is_active()
    }

    fn begin_transit(&mut self, destination: Position) {
        self.position = destination;
        self.transit.begin(self.move_duration);
    }
}

/// Mutable state of a single enemy agent.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EntityId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Position,
    pub(crate) rests_next_turn: bool,
    pub(crate) transit: Transit,
    move_duration: Duration,
}

impl EnemyState {
    pub(crate) fn new(
        id: EntityId,
        kind: EnemyKind,
        position: Position,
        move_duration: Duration,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            rests_next_turn: false,
            transit: Transit::default(),
            move_duration,
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            move_duration: self.move_duration,
            rests_next_turn: self.rests_next_turn,
        }
    }
}

impl Movable for EnemyState {
    fn entity(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn in_transit(&self) -> bool {
        self.transit.is_active()
    }

    fn begin_transit(&mut self, destination: Position) {
        self.position = destination;
        self.transit.begin(self.move_duration);
    }
}

/// Static entities that never move once placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fixture {
    Wall { hit_points: i32 },
    House { papered: bool },
    Pickup(PickupKind),
    Exit,
}

impl Fixture {
    pub(crate) fn kind(&self) -> EntityKind {
        match self {
            Self::Wall { .. } => EntityKind::Wall,
            Self::House { .. } => EntityKind::House,
            Self::Pickup(kind) => EntityKind::Pickup(*kind),
            Self::Exit => EntityKind::Exit,
        }
    }

    /// Reports whether the fixture sits on the blocking layer.
    pub(crate) fn blocks(&self) -> bool {
        match self {
            Self::Wall { .. } => true,
            Self::House { papered } => !papered,
            Self::Pickup(_) | Self::Exit => false,
        }
    }
}

/// Snapshot of a fixture stored inside the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixtureState {
    pub(crate) position: Position,
    pub(crate) fixture: Fixture,
}

/// Canonical owner of every live entity on the current level.
#[derive(Debug)]
pub(crate) struct Registry {
    pub(crate) player: PlayerState,
    pub(crate) enemies: Vec<EnemyState>,
    pub(crate) fixtures: BTreeMap<EntityId, FixtureState>,
    next_id: u32,
}

impl Registry {
    /// Creates a registry holding only the player, who always receives the first identifier.
    pub(crate) fn new(start: Position, carry: PlayerCarry, player_move: Duration) -> Self {
        Self {
            player: PlayerState::new(EntityId::new(0), start, carry, player_move),
            enemies: Vec::new(),
            fixtures: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub(crate) fn register_enemy(
        &mut self,
        kind: EnemyKind,
        position: Position,
        move_duration: Duration,
    ) -> EntityId {
        let id = self.allocate();
        self.enemies
            .push(EnemyState::new(id, kind, position, move_duration));
        id
    }

    pub(crate) fn register_fixture(&mut self, position: Position, fixture: Fixture) -> EntityId {
        let id = self.allocate();
        let _ = self
            .fixtures
            .insert(id, FixtureState { position, fixture });
        id
    }

    pub(crate) fn enemy_index(&self, id: EntityId) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.id == id)
    }

    pub(crate) fn remove_fixture(&mut self, id: EntityId) -> Option<FixtureState> {
        self.fixtures.remove(&id)
    }

    pub(crate) fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if id == self.player.id {
            return Some(EntityKind::Player);
        }
        if let Some(index) = self.enemy_index(id) {
            return Some(EntityKind::Enemy(self.enemies[index].kind));
        }
        self.fixtures.get(&id).map(|state| state.fixture.kind())
    }
}
