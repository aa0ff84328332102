use std::time::Duration;

use candy_crawl_core::{
    Board, BoardLayout, Command, Direction, EnemyKind, EntityKind, Event, IgnoredIntent,
    ObstacleKind, PickupKind, PlayerCarry, Position, Tile, TurnPhase,
};
use candy_crawl_world::{self as world, query, World};

fn start_level(layout: BoardLayout, level: u32, carry: PlayerCarry) -> World {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            level,
            layout,
            carry,
        },
        &mut events,
    );
    world::apply(&mut world, Command::BeginLevel, &mut events);
    world
}

fn run(world: &mut World, commands: &[Command]) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command.clone(), &mut events);
    }
    events
}

fn next_turn() -> [Command; 2] {
    [
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        Command::EndEnemiesTurn,
    ]
}

fn board() -> BoardLayout {
    BoardLayout::new(Board::new(6, 6), Position::new(0, 0))
}

#[test]
fn candy_restores_food_and_disappears() {
    let layout = board().with_placement(Position::new(1, 0), Tile::Pickup(PickupKind::Candy));
    let mut world = start_level(layout, 1, PlayerCarry::new(5, 0));
    let (candy, _) = query::overlay_at(&world, Position::new(1, 0)).expect("candy placed");

    let events = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);

    assert!(events.contains(&Event::PickupCollected {
        pickup: candy,
        kind: PickupKind::Candy,
    }));
    assert!(events.contains(&Event::PlayerStatsChanged {
        food: 14,
        paper: 0,
        food_delta: 9,
    }));
    assert_eq!(query::overlay_at(&world, Position::new(1, 0)), None);
    assert_eq!(query::entity_kind(&world, candy), None);
}

#[test]
fn paper_is_spent_on_a_house_for_points() {
    let layout = board()
        .with_placement(Position::new(1, 0), Tile::Pickup(PickupKind::Paper))
        .with_placement(Position::new(2, 0), Tile::Obstacle(ObstacleKind::House));
    let mut world = start_level(layout, 1, PlayerCarry::new(20, 0));
    let (house, kind) = query::blocker_at(&world, Position::new(2, 0)).expect("house placed");
    assert_eq!(kind, EntityKind::House);

    let _ = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);
    assert_eq!(query::player(&world).paper, 1);
    let _ = run(&mut world, &next_turn());

    let events = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);
    assert!(events.contains(&Event::HousePapered { house, points: 100 }));
    let player = query::player(&world);
    assert_eq!(player.paper, 0);
    assert_eq!(player.food, 118);
    assert_eq!(player.position, Position::new(1, 0));
    assert!(query::is_passable(&world, Position::new(2, 0)));
    assert_eq!(query::entity_kind(&world, house), Some(EntityKind::House));
}

#[test]
fn house_without_paper_is_left_alone() {
    let layout = board().with_placement(Position::new(1, 0), Tile::Obstacle(ObstacleKind::House));
    let mut world = start_level(layout, 1, PlayerCarry::new(20, 0));

    let events = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::HousePapered { .. })));
    assert!(!query::is_passable(&world, Position::new(1, 0)));
    assert_eq!(query::player(&world).food, 19);
    assert_eq!(query::phase(&world), TurnPhase::EnemiesTurn);
}

#[test]
fn exit_locks_player_until_level_advances() {
    let layout = BoardLayout::new(Board::new(2, 1), Position::new(0, 0))
        .with_placement(Position::new(1, 0), Tile::Exit);
    let mut world = start_level(layout, 3, PlayerCarry::new(30, 2));

    let events = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);
    assert!(events.contains(&Event::ExitReached { level: 3 }));
    assert!(!query::player(&world).active);

    let _ = run(&mut world, &next_turn());
    let ignored = run(&mut world, &[Command::MovePlayer { dx: -1, dy: 0 }]);
    assert_eq!(
        ignored,
        vec![Event::IntentIgnored {
            reason: IgnoredIntent::PlayerInactive,
        }]
    );

    let completed = run(&mut world, &[Command::AdvanceLevel]);
    assert_eq!(
        completed,
        vec![
            Event::LevelCompleted {
                level: 3,
                carry: PlayerCarry::new(29, 2),
            },
            Event::PhaseChanged {
                phase: TurnPhase::Setup,
            },
        ]
    );
}

#[test]
fn advance_level_requires_the_exit() {
    let mut world = start_level(board(), 1, PlayerCarry::new(30, 0));
    let events = run(&mut world, &[Command::AdvanceLevel]);
    assert_eq!(
        events,
        vec![Event::IntentIgnored {
            reason: IgnoredIntent::IllegalTurnAction(TurnPhase::PlayerTurn),
        }]
    );
}

#[test]
fn enemy_damage_scales_with_level() {
    let layout = board().with_placement(Position::new(2, 0), Tile::EnemySpawn(EnemyKind::Zombie));
    let mut world = start_level(layout, 3, PlayerCarry::new(50, 0));
    let enemy = query::enemy_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("enemy registered");

    let events = run(
        &mut world,
        &[
            Command::MovePlayer { dx: 1, dy: 0 },
            Command::MoveEnemy {
                enemy,
                direction: Direction::West,
            },
        ],
    );

    assert!(events.contains(&Event::PlayerDamaged { enemy, amount: 12 }));
    assert_eq!(query::player(&world).food, 37);
}

#[test]
fn enemy_bumping_a_wall_has_no_effect() {
    let layout = board()
        .with_placement(Position::new(3, 3), Tile::Obstacle(ObstacleKind::Wall))
        .with_placement(Position::new(4, 3), Tile::EnemySpawn(EnemyKind::Vampire));
    let mut world = start_level(layout, 2, PlayerCarry::new(50, 0));
    let (wall, _) = query::blocker_at(&world, Position::new(3, 3)).expect("wall placed");
    let enemy = query::enemy_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("enemy registered");

    let events = run(
        &mut world,
        &[
            Command::MovePlayer { dx: 0, dy: 1 },
            Command::MoveEnemy {
                enemy,
                direction: Direction::West,
            },
        ],
    );

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::WallDamaged { .. })));
    assert_eq!(query::wall_hit_points(&world, wall), Some(2));
    assert_eq!(query::player(&world).food, 49);
}

#[test]
fn starvation_triggers_game_over_and_blocks_everything() {
    let layout = board().with_placement(Position::new(3, 3), Tile::EnemySpawn(EnemyKind::Zombie));
    let mut world = start_level(layout, 2, PlayerCarry::new(1, 0));
    let enemy = query::enemy_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("enemy registered");

    let events = run(&mut world, &[Command::MovePlayer { dx: 1, dy: 0 }]);
    assert!(events.contains(&Event::GameOver { level: 2 }));
    assert_eq!(query::phase(&world), TurnPhase::GameOver);

    let after = run(
        &mut world,
        &[
            Command::MovePlayer { dx: 1, dy: 0 },
            Command::CueEnemy { enemy },
            Command::MoveEnemy {
                enemy,
                direction: Direction::West,
            },
            Command::EndEnemiesTurn,
            Command::BeginLevel,
        ],
    );
    assert!(after.iter().all(|event| matches!(
        event,
        Event::IntentIgnored {
            reason: IgnoredIntent::IllegalTurnAction(TurnPhase::GameOver)
        }
    )));
    assert_eq!(after.len(), 5);
    assert_eq!(query::player(&world).position, Position::new(1, 0));
}
