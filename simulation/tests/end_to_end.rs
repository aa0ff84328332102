use std::time::Duration;

use candy_crawl_core::{
    Board, BoardLayout, CountRange, EnemyKind, Event, GameConfig, IgnoredIntent, PickupKind,
    PlayerCarry, Position, Tile, TurnPhase,
};
use candy_crawl_simulation::Simulation;

fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn empty_board_config(columns: u32, rows: u32) -> GameConfig {
    let mut config = GameConfig::default();
    config.board.columns = columns;
    config.board.rows = rows;
    config.board.obstacle_count = CountRange::exactly(0);
    config.board.pickup_count = CountRange::exactly(0);
    config
}

#[test]
fn adjacent_enemy_starves_the_player_into_game_over() {
    let mut simulation = Simulation::new(GameConfig::default(), 7).expect("valid config");
    let layout = BoardLayout::new(Board::new(5, 5), Position::new(0, 0))
        .with_placement(Position::new(1, 0), Tile::Pickup(PickupKind::Candy))
        .with_placement(Position::new(2, 0), Tile::EnemySpawn(EnemyKind::Zombie));
    simulation
        .load_layout(2, layout, PlayerCarry::new(1, 0))
        .expect("layout fits the board limits");

    simulation.advance(millis(2_000));
    assert_eq!(simulation.phase(), TurnPhase::PlayerTurn);

    // Food 1 - 1 + 10 leaves the player at 10, right next to the zombie.
    simulation.submit_intent(1, 0);
    assert_eq!(simulation.player().food, 10);
    assert_eq!(simulation.phase(), TurnPhase::EnemiesTurn);
    let _ = simulation.drain_events();

    simulation.advance(millis(100));
    let events = simulation.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        Event::PlayerDamaged { amount: 11, .. }
    )));
    assert!(events.contains(&Event::GameOver { level: 2 }));
    assert_eq!(simulation.player().food, -1);
    assert!(simulation.is_over());
    assert_eq!(simulation.time_until_next(), None);

    simulation.submit_intent(0, 1);
    simulation.advance(millis(5_000));
    let after = simulation.drain_events();
    assert!(!after.iter().any(|event| matches!(
        event,
        Event::EnemyCued { .. }
            | Event::AgentMoved { .. }
            | Event::PlayerDamaged { .. }
            | Event::PhaseChanged { .. }
    )));
    assert!(after.contains(&Event::IntentIgnored {
        reason: IgnoredIntent::IllegalTurnAction(TurnPhase::GameOver),
    }));
    assert_eq!(simulation.player().position, Position::new(1, 0));
}

#[test]
fn reaching_the_exit_carries_counters_into_the_next_level() {
    let mut simulation = Simulation::new(empty_board_config(3, 3), 11).expect("valid config");
    simulation.setup_scene(1).expect("level 1 generates");
    simulation.advance(millis(2_000));

    for (dx, dy) in [(1, 0), (1, 0), (0, 1), (0, 1)] {
        assert_eq!(simulation.phase(), TurnPhase::PlayerTurn);
        simulation.submit_intent(dx, dy);
        // Level 1 has no enemies, so the turn lasts two baseline delays.
        simulation.advance(millis(200));
    }
    assert_eq!(simulation.player().position, Position::new(2, 2));
    assert!(!simulation.player().active);

    simulation.advance(millis(800));
    let events = simulation.drain_events();
    assert!(events.contains(&Event::LevelCompleted {
        level: 1,
        carry: PlayerCarry::new(96, 0),
    }));
    assert_eq!(simulation.carry(), PlayerCarry::new(96, 0));

    simulation.setup_scene(2).expect("level 2 generates");
    assert_eq!(simulation.level(), 2);
    assert_eq!(simulation.player().food, 96);
    assert!(simulation.player().active);
    let loaded = simulation.drain_events();
    assert!(loaded.contains(&Event::LevelLoaded {
        level: 2,
        board: Board::new(3, 3),
        enemy_count: 1,
    }));
}

#[test]
fn enemies_turn_hands_back_control_after_every_cue() {
    let mut simulation = Simulation::new(GameConfig::default(), 3).expect("valid config");
    let layout = BoardLayout::new(Board::new(6, 6), Position::new(0, 0))
        .with_placement(Position::new(5, 5), Tile::EnemySpawn(EnemyKind::Zombie))
        .with_placement(Position::new(5, 1), Tile::EnemySpawn(EnemyKind::Vampire));
    simulation
        .load_layout(4, layout, PlayerCarry::new(50, 0))
        .expect("layout fits the board limits");
    simulation.advance(millis(2_000));
    let _ = simulation.drain_events();

    simulation.submit_intent(0, 1);
    for _ in 0..6 {
        simulation.advance(millis(50));
    }
    let events = simulation.drain_events();
    let cued: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyCued { enemy } => Some(enemy.get()),
            _ => None,
        })
        .collect();
    assert_eq!(cued, vec![1, 2]);

    let moved: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::AgentMoved { entity, to, .. } if entity.get() != 0 => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(moved, vec![Position::new(4, 5), Position::new(4, 1)]);
    assert_eq!(simulation.phase(), TurnPhase::PlayerTurn);
}
