#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Candy Crawl.
//!
//! The world owns the entity registry, the occupancy index, and the active
//! turn phase. Every mutation flows through [`apply`], which gates commands on
//! the current phase and reports outcomes as events.

mod movement;
mod occupancy;
mod registry;

use std::time::Duration;

use candy_crawl_core::{
    Animation, Blocker, Board, BoardLayout, Command, Direction, EnemyKind, EntityId, EntityKind,
    Event, IgnoredIntent, MoveOutcome, ObstacleKind, PacingConfig, PickupKind, PlayerCarry,
    Position, RulesConfig, SoundEffect, Tile, TurnPhase,
};
use tracing::{debug, info, trace, warn};

use movement::attempt_move;
use occupancy::{Layer, OccupancyIndex, Occupant};
use registry::{Fixture, Registry};

/// Represents the authoritative Candy Crawl world state.
#[derive(Debug)]
pub struct World {
    rules: RulesConfig,
    pacing: PacingConfig,
    level: u32,
    board: Board,
    phase: TurnPhase,
    registry: Registry,
    occupancy: OccupancyIndex,
}

impl World {
    /// Creates an empty world waiting for its first level.
    #[must_use]
    pub fn new(rules: RulesConfig, pacing: PacingConfig) -> Self {
        let board = Board::new(0, 0);
        let carry = PlayerCarry::new(rules.starting_food, rules.starting_paper);
        Self {
            registry: Registry::new(
                Position::new(0, 0),
                carry,
                pacing.player_move_duration(),
            ),
            occupancy: OccupancyIndex::new(board),
            board,
            level: 0,
            phase: TurnPhase::Setup,
            rules,
            pacing,
        }
    }

    fn set_phase(&mut self, phase: TurnPhase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn load_level(
        &mut self,
        level: u32,
        layout: &BoardLayout,
        carry: PlayerCarry,
        out_events: &mut Vec<Event>,
    ) {
        let board = layout.board();
        if !board.is_supported() {
            warn!(
                level,
                columns = board.columns(),
                rows = board.rows(),
                "layout board outside supported size"
            );
            ignore(IgnoredIntent::UnsupportedBoard(board), out_events);
            return;
        }
        self.level = level;
        self.board = board;
        self.phase = TurnPhase::Setup;
        self.registry = Registry::new(
            layout.player_start(),
            carry,
            self.pacing.player_move_duration(),
        );
        self.occupancy = OccupancyIndex::new(board);

        let player = Occupant {
            id: self.registry.player.id,
            kind: EntityKind::Player,
        };
        let start = self.registry.player.position;
        if !self.occupancy.occupy(Layer::Blocking, start, player) {
            warn!(?start, "player start lies outside the board");
        }
        out_events.push(Event::EntitySpawned {
            entity: player.id,
            kind: EntityKind::Player,
            position: start,
        });

        for placement in layout.placements() {
            self.spawn(placement.position, placement.tile, out_events);
        }

        let enemy_count = self.registry.enemies.len();
        info!(level, enemy_count, food = carry.food, "level loaded");
        out_events.push(Event::LevelLoaded {
            level,
            board,
            enemy_count,
        });
        out_events.push(Event::PhaseChanged {
            phase: TurnPhase::Setup,
        });
    }

    fn spawn(&mut self, position: Position, tile: Tile, out_events: &mut Vec<Event>) {
        let spawn = match tile {
            Tile::Obstacle(ObstacleKind::Wall) => Spawn::Fixture(Fixture::Wall {
                hit_points: self.rules.wall_hit_points,
            }),
            Tile::Obstacle(ObstacleKind::House) => {
                Spawn::Fixture(Fixture::House { papered: false })
            }
            Tile::Pickup(kind) => Spawn::Fixture(Fixture::Pickup(kind)),
            Tile::Exit => Spawn::Fixture(Fixture::Exit),
            Tile::EnemySpawn(kind) => Spawn::Enemy(kind),
            Tile::Border | Tile::Floor => {
                trace!(?position, ?tile, "ground tile carries no entity");
                return;
            }
        };

        let (kind, layer) = match spawn {
            Spawn::Enemy(kind) => (EntityKind::Enemy(kind), Layer::Blocking),
            Spawn::Fixture(fixture) if fixture.blocks() => (fixture.kind(), Layer::Blocking),
            Spawn::Fixture(fixture) => (fixture.kind(), Layer::Overlay),
        };

        let taken = match layer {
            Layer::Blocking => self.occupancy.blocker(position).is_some(),
            Layer::Overlay => self.occupancy.overlay(position).is_some(),
        };
        if taken || !self.board.contains(position) {
            warn!(?position, ?kind, "placement dropped: cell unavailable");
            return;
        }

        let id = match spawn {
            Spawn::Enemy(enemy) => self.registry.register_enemy(
                enemy,
                position,
                self.pacing.enemy_move_duration(enemy),
            ),
            Spawn::Fixture(fixture) => self.registry.register_fixture(position, fixture),
        };
        let _ = self.occupancy.occupy(layer, position, Occupant { id, kind });
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind,
            position,
        });
    }

    fn advance_transits(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.registry.player.transit.advance(dt) {
            out_events.push(Event::TransitCompleted {
                entity: self.registry.player.id,
            });
        }
        for enemy in &mut self.registry.enemies {
            if enemy.transit.advance(dt) {
                out_events.push(Event::TransitCompleted { entity: enemy.id });
            }
        }
    }

    fn move_player(&mut self, dx: i32, dy: i32, out_events: &mut Vec<Event>) {
        if self.phase != TurnPhase::PlayerTurn {
            ignore(IgnoredIntent::IllegalTurnAction(self.phase), out_events);
            return;
        }
        if !self.registry.player.active {
            ignore(IgnoredIntent::PlayerInactive, out_events);
            return;
        }
        let Some(direction) = Direction::from_delta(dx, dy) else {
            ignore(IgnoredIntent::InvalidDirection, out_events);
            return;
        };

        let player_id = self.registry.player.id;
        let from = self.registry.player.position;
        let food_before = self.registry.player.food;
        self.registry.player.food = food_before.saturating_sub(self.rules.food_per_move);

        let occupant = Occupant {
            id: player_id,
            kind: EntityKind::Player,
        };
        match attempt_move(
            &mut self.registry.player,
            direction,
            &mut self.occupancy,
            occupant,
        ) {
            MoveOutcome::Moved(to) => {
                debug!(?from, ?to, "player moved");
                out_events.push(Event::AgentMoved {
                    entity: player_id,
                    from,
                    to,
                });
                out_events.push(Event::SoundCue {
                    effect: SoundEffect::Footstep,
                });
                self.resolve_overlap(to, out_events);
            }
            MoveOutcome::Blocked(blocker) => {
                out_events.push(Event::AgentBlocked {
                    entity: player_id,
                    blocker,
                });
                if let Blocker::Entity { id, kind } = blocker {
                    match kind {
                        EntityKind::Wall => self.damage_wall(id, out_events),
                        EntityKind::House => self.paper_house(id, out_events),
                        EntityKind::Player
                        | EntityKind::Enemy(_)
                        | EntityKind::Pickup(_)
                        | EntityKind::Exit => {}
                    }
                }
            }
            MoveOutcome::Stalled => out_events.push(Event::AgentStalled { entity: player_id }),
        }

        let player = &self.registry.player;
        out_events.push(Event::PlayerStatsChanged {
            food: player.food,
            paper: player.paper,
            food_delta: player.food.saturating_sub(food_before),
        });

        if !self.check_starvation(out_events) {
            self.set_phase(TurnPhase::EnemiesTurn, out_events);
        }
    }

    fn damage_wall(&mut self, wall: EntityId, out_events: &mut Vec<Event>) {
        let player_id = self.registry.player.id;
        let damage = self.rules.wall_damage;
        let Some(state) = self.registry.fixtures.get_mut(&wall) else {
            return;
        };
        let Fixture::Wall { hit_points } = &mut state.fixture else {
            return;
        };
        *hit_points = hit_points.saturating_sub(damage);
        let remaining = *hit_points;
        let position = state.position;

        debug!(wall = wall.get(), remaining, "wall damaged");
        out_events.push(Event::AnimationCue {
            entity: player_id,
            animation: Animation::Attack,
        });
        out_events.push(Event::SoundCue {
            effect: SoundEffect::Chop,
        });
        out_events.push(Event::WallDamaged { wall, remaining });

        if remaining <= 0 {
            let _ = self.registry.remove_fixture(wall);
            self.occupancy.vacate(Layer::Blocking, position, wall);
            out_events.push(Event::EntityRemoved { entity: wall });
        }
    }

    fn paper_house(&mut self, house: EntityId, out_events: &mut Vec<Event>) {
        if self.registry.player.paper == 0 {
            trace!(house = house.get(), "house left alone: no paper");
            return;
        }
        let Some(state) = self.registry.fixtures.get_mut(&house) else {
            return;
        };
        let Fixture::House { papered } = &mut state.fixture else {
            return;
        };
        if *papered {
            return;
        }
        *papered = true;
        let position = state.position;
        self.occupancy.vacate(Layer::Blocking, position, house);

        let points = self.rules.points_per_house;
        let player = &mut self.registry.player;
        player.paper -= 1;
        player.food = player.food.saturating_add(points);

        debug!(house = house.get(), points, "house papered");
        out_events.push(Event::AnimationCue {
            entity: player.id,
            animation: Animation::Attack,
        });
        out_events.push(Event::SoundCue {
            effect: SoundEffect::Raid,
        });
        out_events.push(Event::HousePapered { house, points });
    }

    fn resolve_overlap(&mut self, position: Position, out_events: &mut Vec<Event>) {
        let Some(occupant) = self.occupancy.overlay(position) else {
            return;
        };
        match occupant.kind {
            EntityKind::Pickup(kind) => self.collect_pickup(occupant.id, kind, position, out_events),
            EntityKind::Exit => {
                info!(level = self.level, "exit reached");
                self.registry.player.active = false;
                out_events.push(Event::ExitReached { level: self.level });
            }
            EntityKind::Player | EntityKind::Enemy(_) | EntityKind::Wall | EntityKind::House => {}
        }
    }

    fn collect_pickup(
        &mut self,
        pickup: EntityId,
        kind: PickupKind,
        position: Position,
        out_events: &mut Vec<Event>,
    ) {
        let _ = self.registry.remove_fixture(pickup);
        self.occupancy.vacate(Layer::Overlay, position, pickup);

        let player = &mut self.registry.player;
        player.food = player.food.saturating_add(self.rules.pickup_food(kind));
        let effect = match kind {
            PickupKind::Candy => SoundEffect::Chew,
            PickupKind::Soda => SoundEffect::Drink,
            PickupKind::Paper => {
                player.paper = player.paper.saturating_add(1);
                SoundEffect::Rustle
            }
        };

        debug!(pickup = pickup.get(), ?kind, "pickup collected");
        out_events.push(Event::PickupCollected { pickup, kind });
        out_events.push(Event::EntityRemoved { entity: pickup });
        out_events.push(Event::SoundCue { effect });
    }

    fn cue_enemy(&mut self, enemy: EntityId, out_events: &mut Vec<Event>) {
        if self.phase != TurnPhase::EnemiesTurn {
            ignore(IgnoredIntent::IllegalTurnAction(self.phase), out_events);
            return;
        }
        if self.registry.enemy_index(enemy).is_none() {
            warn!(enemy = enemy.get(), "cue for unknown enemy");
            ignore(IgnoredIntent::UnknownAgent, out_events);
            return;
        }
        out_events.push(Event::EnemyCued { enemy });
    }

    fn move_enemy(&mut self, enemy: EntityId, direction: Direction, out_events: &mut Vec<Event>) {
        if self.phase != TurnPhase::EnemiesTurn {
            ignore(IgnoredIntent::IllegalTurnAction(self.phase), out_events);
            return;
        }
        let Some(index) = self.registry.enemy_index(enemy) else {
            ignore(IgnoredIntent::UnknownAgent, out_events);
            return;
        };

        let agent = &mut self.registry.enemies[index];
        if agent.rests_next_turn {
            agent.rests_next_turn = false;
            trace!(enemy = enemy.get(), "enemy rests");
            out_events.push(Event::EnemyRested { enemy });
            return;
        }

        let from = agent.position;
        let kind = agent.kind;
        let occupant = Occupant {
            id: enemy,
            kind: EntityKind::Enemy(kind),
        };
        let outcome = attempt_move(agent, direction, &mut self.occupancy, occupant);
        agent.rests_next_turn = true;

        match outcome {
            MoveOutcome::Moved(to) => {
                debug!(enemy = enemy.get(), ?from, ?to, "enemy moved");
                out_events.push(Event::AgentMoved {
                    entity: enemy,
                    from,
                    to,
                });
            }
            MoveOutcome::Blocked(blocker) => {
                out_events.push(Event::AgentBlocked {
                    entity: enemy,
                    blocker,
                });
                if let Blocker::Entity { kind: target, .. } = blocker {
                    match target {
                        EntityKind::Player => self.attack_player(enemy, kind, out_events),
                        EntityKind::Enemy(_)
                        | EntityKind::Wall
                        | EntityKind::House
                        | EntityKind::Pickup(_)
                        | EntityKind::Exit => {}
                    }
                }
            }
            MoveOutcome::Stalled => out_events.push(Event::AgentStalled { entity: enemy }),
        }
    }

    fn attack_player(&mut self, enemy: EntityId, kind: EnemyKind, out_events: &mut Vec<Event>) {
        let damage = self.rules.enemy_damage(kind, self.level);
        let player = &mut self.registry.player;
        player.food = player.food.saturating_sub(damage);

        debug!(enemy = enemy.get(), damage, food = player.food, "player attacked");
        out_events.push(Event::AnimationCue {
            entity: enemy,
            animation: Animation::Attack,
        });
        out_events.push(Event::SoundCue {
            effect: SoundEffect::EnemyAttack,
        });
        out_events.push(Event::AnimationCue {
            entity: player.id,
            animation: Animation::Hit,
        });
        out_events.push(Event::PlayerDamaged {
            enemy,
            amount: damage,
        });
        out_events.push(Event::PlayerStatsChanged {
            food: player.food,
            paper: player.paper,
            food_delta: damage.saturating_neg(),
        });

        let _ = self.check_starvation(out_events);
    }

    /// Transitions into the terminal phase once food is depleted.
    fn check_starvation(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.registry.player.food > 0 {
            return false;
        }
        if self.phase == TurnPhase::GameOver {
            return true;
        }
        info!(
            level = self.level,
            food = self.registry.player.food,
            "player starved"
        );
        out_events.push(Event::SoundCue {
            effect: SoundEffect::GameOver,
        });
        self.set_phase(TurnPhase::GameOver, out_events);
        out_events.push(Event::GameOver { level: self.level });
        true
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        if self.phase == TurnPhase::GameOver || self.registry.player.active {
            ignore(IgnoredIntent::IllegalTurnAction(self.phase), out_events);
            return;
        }
        let carry = self.registry.player.carry();
        info!(level = self.level, food = carry.food, "level completed");
        out_events.push(Event::LevelCompleted {
            level: self.level,
            carry,
        });
        self.set_phase(TurnPhase::Setup, out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(RulesConfig::default(), PacingConfig::default())
    }
}

#[derive(Clone, Copy, Debug)]
enum Spawn {
    Enemy(EnemyKind),
    Fixture(Fixture),
}

fn ignore(reason: IgnoredIntent, out_events: &mut Vec<Event>) {
    trace!(?reason, "intent ignored");
    out_events.push(Event::IntentIgnored { reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel {
            level,
            layout,
            carry,
        } => world.load_level(level, &layout, carry, out_events),
        Command::BeginLevel => {
            if world.phase == TurnPhase::Setup && world.level > 0 {
                world.set_phase(TurnPhase::PlayerTurn, out_events);
            } else {
                ignore(IgnoredIntent::IllegalTurnAction(world.phase), out_events);
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_transits(dt, out_events);
        }
        Command::MovePlayer { dx, dy } => world.move_player(dx, dy, out_events),
        Command::CueEnemy { enemy } => world.cue_enemy(enemy, out_events),
        Command::MoveEnemy { enemy, direction } => world.move_enemy(enemy, direction, out_events),
        Command::EndEnemiesTurn => {
            if world.phase == TurnPhase::EnemiesTurn {
                world.set_phase(TurnPhase::PlayerTurn, out_events);
            } else {
                ignore(IgnoredIntent::IllegalTurnAction(world.phase), out_events);
            }
        }
        Command::AdvanceLevel => world.advance_level(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use candy_crawl_core::{
        Board, EnemyView, EntityId, EntityKind, PlayerCarry, PlayerSnapshot, Position, TurnPhase,
    };

    use super::{registry::Fixture, World};

    /// Phase currently gating agent actions.
    #[must_use]
    pub fn phase(world: &World) -> TurnPhase {
        world.phase
    }

    /// Level counter of the loaded level; zero before the first load.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Bounds of the current board.
    #[must_use]
    pub fn board(world: &World) -> Board {
        world.board
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.registry.player.snapshot()
    }

    /// Counters that would be carried into the next level.
    #[must_use]
    pub fn carry(world: &World) -> PlayerCarry {
        world.registry.player.carry()
    }

    /// Captures a read-only view of the enemies in registration order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .registry
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Blocking entity occupying the cell, if any.
    #[must_use]
    pub fn blocker_at(world: &World, position: Position) -> Option<(EntityId, EntityKind)> {
        world
            .occupancy
            .blocker(position)
            .map(|occupant| (occupant.id, occupant.kind))
    }

    /// Non-blocking entity (pickup or exit) lying on the cell, if any.
    #[must_use]
    pub fn overlay_at(world: &World, position: Position) -> Option<(EntityId, EntityKind)> {
        world
            .occupancy
            .overlay(position)
            .map(|occupant| (occupant.id, occupant.kind))
    }

    /// Reports whether an agent could step onto the cell right now.
    #[must_use]
    pub fn is_passable(world: &World, position: Position) -> bool {
        world.board.contains(position) && world.occupancy.blocker(position).is_none()
    }

    /// Kind of a live entity.
    #[must_use]
    pub fn entity_kind(world: &World, entity: EntityId) -> Option<EntityKind> {
        world.registry.kind_of(entity)
    }

    /// Remaining hit points of a live wall.
    #[must_use]
    pub fn wall_hit_points(world: &World, wall: EntityId) -> Option<i32> {
        world
            .registry
            .fixtures
            .get(&wall)
            .and_then(|state| match state.fixture {
                Fixture::Wall { hit_points } => Some(hit_points),
                Fixture::House { .. } | Fixture::Pickup(_) | Fixture::Exit => None,
            })
    }

    /// Number of live static entities (walls, houses, pickups, exit).
    #[must_use]
    pub fn fixture_count(world: &World) -> usize {
        world.registry.fixtures.len()
    }
}
