//! Grid-aligned movement and blocker resolution shared by all agents.

use candy_crawl_core::{Blocker, Direction, EntityId, MoveOutcome, Position};
use tracing::debug;

use crate::occupancy::{OccupancyIndex, Occupant};

/// Capability implemented by every agent that may attempt a step.
pub(crate) trait Movable {
    fn entity(&self) -> EntityId;
    fn position(&self) -> Position;
    fn in_transit(&self) -> bool;
    /// Commits the agent to `destination` and starts its transit clock.
    fn begin_transit(&mut self, destination: Position);
}

/// Attempts to move `agent` one cell in `direction`.
///
/// This is the only path through which an agent's position changes. The
/// destination is checked against the border ring and the blocking layer of
/// the index; on success both the agent and the index are updated.
pub(crate) fn attempt_move<A: Movable>(
    agent: &mut A,
    direction: Direction,
    occupancy: &mut OccupancyIndex,
    occupant: Occupant,
) -> MoveOutcome {
    let from = agent.position();
    let target = from.offset(direction);

    if let Some(blocker) = line_query(occupancy, target) {
        debug!(entity = agent.entity().get(), ?blocker, "move blocked");
        return MoveOutcome::Blocked(blocker);
    }

    if agent.in_transit() {
        return MoveOutcome::Stalled;
    }

    occupancy.relocate(from, target, occupant);
    agent.begin_transit(target);
    MoveOutcome::Moved(target)
}

fn line_query(occupancy: &OccupancyIndex, target: Position) -> Option<Blocker> {
    if !occupancy.board().contains(target) {
        return Some(Blocker::Border(target));
    }
    occupancy
        .blocker(target)
        .map(|occupant| Blocker::Entity {
            id: occupant.id,
            kind: occupant.kind,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::Layer;
    use candy_crawl_core::{Board, EntityKind};

    #[derive(Debug)]
    struct Walker {
        id: EntityId,
        position: Position,
        moving: bool,
    }

    impl Movable for Walker {
        fn entity(&self) -> EntityId {
            self.id
        }

        fn position(&self) -> Position {
            self.position
        }

        fn in_transit(&self) -> bool {
            self.moving
        }

        fn begin_transit(&mut self, destination: Position) {
            self.position = destination;
            self.moving = true;
        }
    }

    fn setup(start: Position) -> (Walker, OccupancyIndex, Occupant) {
        let occupant = Occupant {
            id: EntityId::new(0),
            kind: EntityKind::Player,
        };
        let mut index = OccupancyIndex::new(Board::new(4, 4));
        assert!(index.occupy(Layer::Blocking, start, occupant));
        let walker = Walker {
            id: occupant.id,
            position: start,
            moving: false,
        };
        (walker, index, occupant)
    }

    #[test]
    fn free_cell_moves_agent_and_index() {
        let (mut walker, mut index, occupant) = setup(Position::new(1, 1));
        let outcome = attempt_move(&mut walker, Direction::East, &mut index, occupant);
        assert_eq!(outcome, MoveOutcome::Moved(Position::new(2, 1)));
        assert_eq!(walker.position, Position::new(2, 1));
        assert_eq!(index.blocker(Position::new(1, 1)), None);
        assert_eq!(index.blocker(Position::new(2, 1)), Some(occupant));
    }

    #[test]
    fn border_blocks_without_moving() {
        let (mut walker, mut index, occupant) = setup(Position::new(0, 0));
        let outcome = attempt_move(&mut walker, Direction::South, &mut index, occupant);
        assert_eq!(
            outcome,
            MoveOutcome::Blocked(Blocker::Border(Position::new(0, -1)))
        );
        assert_eq!(walker.position, Position::new(0, 0));
    }

    #[test]
    fn blocking_entity_is_reported() {
        let (mut walker, mut index, occupant) = setup(Position::new(1, 1));
        let wall = Occupant {
            id: EntityId::new(7),
            kind: EntityKind::Wall,
        };
        assert!(index.occupy(Layer::Blocking, Position::new(1, 2), wall));
        let outcome = attempt_move(&mut walker, Direction::North, &mut index, occupant);
        assert_eq!(
            outcome,
            MoveOutcome::Blocked(Blocker::Entity {
                id: wall.id,
                kind: EntityKind::Wall,
            })
        );
        assert_eq!(walker.position, Position::new(1, 1));
    }

    #[test]
    fn agent_in_transit_stalls() {
        let (mut walker, mut index, occupant) = setup(Position::new(1, 1));
        walker.moving = true;
        let outcome = attempt_move(&mut walker, Direction::East, &mut index, occupant);
        assert_eq!(outcome, MoveOutcome::Stalled);
        assert_eq!(walker.position, Position::new(1, 1));
    }
}
