#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn pacing system that sequences level intros, enemy turns and level
//! advances as timed continuations.
//!
//! The scheduler never mutates the world. It reads world events, keeps its
//! own clock from [`Event::TimeAdvanced`], and answers with the commands
//! whose delay has elapsed.

mod queue;

use std::time::Duration;

use candy_crawl_core::{Command, EnemyView, Event, PacingConfig, TurnPhase};
use tracing::{debug, info};

use queue::{Continuation, ContinuationQueue};

/// Pure system emitting phase-driving commands once their delays elapse.
#[derive(Debug)]
pub struct TurnScheduler {
    pacing: PacingConfig,
    clock: Duration,
    queue: ContinuationQueue,
    halted: bool,
}

impl TurnScheduler {
    /// Creates a scheduler using the provided pacing delays.
    #[must_use]
    pub fn new(pacing: PacingConfig) -> Self {
        Self {
            pacing,
            clock: Duration::ZERO,
            queue: ContinuationQueue::default(),
            halted: false,
        }
    }

    /// Consumes world events and emits every continuation that fell due.
    ///
    /// `enemies` must reflect the world after the events were produced; it
    /// fixes the order and durations of an enemies turn when one begins.
    pub fn handle(&mut self, events: &[Event], enemies: &EnemyView, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.clock = self.clock.saturating_add(*dt);
                    self.release(out);
                }
                Event::LevelLoaded { level, .. } => {
                    self.queue.clear();
                    self.halted = false;
                    let due = self.clock.saturating_add(self.pacing.level_start_delay());
                    debug!(level, ?due, "level intro scheduled");
                    self.queue.schedule(due, Continuation::BeginLevel);
                }
                Event::PhaseChanged {
                    phase: TurnPhase::EnemiesTurn,
                } if !self.halted => self.plan_enemies_turn(enemies),
                Event::PhaseChanged {
                    phase: TurnPhase::GameOver,
                } => {
                    info!(pending = self.queue.len(), "scheduler halted");
                    self.queue.clear();
                    self.halted = true;
                }
                Event::ExitReached { level } if !self.halted => {
                    let due = self.clock.saturating_add(self.pacing.restart_delay());
                    debug!(level, ?due, "level advance scheduled");
                    self.queue.schedule(due, Continuation::AdvanceLevel);
                }
                _ => {}
            }
        }
    }

    /// Lays out the strictly sequential enemy timeline.
    fn plan_enemies_turn(&mut self, enemies: &EnemyView) {
        let mut due = self.clock.saturating_add(self.pacing.turn_delay());
        if enemies.is_empty() {
            due = due.saturating_add(self.pacing.turn_delay());
        }
        for enemy in enemies.iter() {
            self.queue.schedule(due, Continuation::CueEnemy(enemy.id));
            due = due.saturating_add(enemy.move_duration);
        }
        self.queue.schedule(due, Continuation::EndEnemiesTurn);
        debug!(enemies = enemies.len(), ?due, "enemies turn planned");
    }

    fn release(&mut self, out: &mut Vec<Command>) {
        while let Some(continuation) = self.queue.pop_ready(self.clock) {
            out.push(continuation.into_command());
        }
    }

    /// Simulation time observed so far.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Number of continuations waiting for their delay.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Time remaining until the next continuation falls due.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.queue
            .next_due()
            .map(|due| due.saturating_sub(self.clock))
    }

    /// Reports whether a game over stopped all scheduling.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
