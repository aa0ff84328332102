//! Dense position-to-entity lookup over the board interior.
//!
//! The index never owns entities; it mirrors the registry and is updated on
//! every successful move, placement, and removal.

use candy_crawl_core::{Board, EntityId, EntityKind, Position};

/// Entity reference stored in a cell slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Occupant {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
}

/// Index layer an entity is stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Layer {
    /// Walls, intact houses and agents.
    Blocking,
    /// Pickups and the exit, which react to overlap instead of contact.
    Overlay,
}

#[derive(Clone, Debug)]
pub(crate) struct OccupancyIndex {
    board: Board,
    blocking: Vec<Option<Occupant>>,
    overlay: Vec<Option<Occupant>>,
}

impl OccupancyIndex {
    pub(crate) fn new(board: Board) -> Self {
        let columns = usize::try_from(board.columns()).unwrap_or(0);
        let rows = usize::try_from(board.rows()).unwrap_or(0);
        let capacity = columns.saturating_mul(rows);
        Self {
            board,
            blocking: vec![None; capacity],
            overlay: vec![None; capacity],
        }
    }

    /// Blocking occupant of an interior cell.
    pub(crate) fn blocker(&self, position: Position) -> Option<Occupant> {
        self.index(position)
            .and_then(|index| self.blocking.get(index).copied().flatten())
    }

    /// Overlay occupant of an interior cell.
    pub(crate) fn overlay(&self, position: Position) -> Option<Occupant> {
        self.index(position)
            .and_then(|index| self.overlay.get(index).copied().flatten())
    }

    /// Stores an occupant, reporting false when the slot is already taken.
    pub(crate) fn occupy(&mut self, layer: Layer, position: Position, occupant: Occupant) -> bool {
        let Some(index) = self.index(position) else {
            return false;
        };
        let slots = match layer {
            Layer::Blocking => &mut self.blocking,
            Layer::Overlay => &mut self.overlay,
        };
        match slots.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(occupant);
                true
            }
            _ => false,
        }
    }

    /// Clears a slot if it currently holds the given entity.
    pub(crate) fn vacate(&mut self, layer: Layer, position: Position, id: EntityId) {
        let Some(index) = self.index(position) else {
            return;
        };
        let slots = match layer {
            Layer::Blocking => &mut self.blocking,
            Layer::Overlay => &mut self.overlay,
        };
        if let Some(slot) = slots.get_mut(index) {
            if slot.is_some_and(|occupant| occupant.id == id) {
                *slot = None;
            }
        }
    }

    /// Moves a blocking occupant between two cells.
    pub(crate) fn relocate(&mut self, from: Position, to: Position, occupant: Occupant) {
        self.vacate(Layer::Blocking, from, occupant.id);
        let _ = self.occupy(Layer::Blocking, to, occupant);
    }

    pub(crate) fn board(&self) -> Board {
        self.board
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.board.contains(position) {
            return None;
        }
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        let width = usize::try_from(self.board.columns()).ok()?;
        Some(row * width + column)
    }
}
