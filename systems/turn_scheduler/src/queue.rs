//! Min-heap of timed continuations keyed by `(due, sequence)`.
//!
//! Continuations falling due at the same instant are released in the order
//! they were scheduled.

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use candy_crawl_core::{Command, EntityId};

/// Deferred scheduler action awaiting its due time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    BeginLevel,
    CueEnemy(EntityId),
    EndEnemiesTurn,
    AdvanceLevel,
}

impl Continuation {
    pub(crate) fn into_command(self) -> Command {
        match self {
            Self::BeginLevel => Command::BeginLevel,
            Self::CueEnemy(enemy) => Command::CueEnemy { enemy },
            Self::EndEnemiesTurn => Command::EndEnemiesTurn,
            Self::AdvanceLevel => Command::AdvanceLevel,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    due: Duration,
    sequence: u64,
    continuation: Continuation,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the earliest entry.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ContinuationQueue {
    heap: BinaryHeap<Entry>,
    next_sequence: u64,
}

impl ContinuationQueue {
    pub(crate) fn schedule(&mut self, due: Duration, continuation: Continuation) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap.push(Entry {
            due,
            sequence,
            continuation,
        });
    }

    /// Pops the next continuation if it is due at or before `now`.
    pub(crate) fn pop_ready(&mut self, now: Duration) -> Option<Continuation> {
        if self.heap.peek().is_some_and(|entry| entry.due <= now) {
            self.heap.pop().map(|entry| entry.continuation)
        } else {
            None
        }
    }

    pub(crate) fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|entry| entry.due)
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
