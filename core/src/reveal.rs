use alloc::vec::Vec;
use core::time::Duration;
use rand::Rng;

use crate::*;

/// Bombs to show one at a time at the end of a game. The caller waits [`RevealSchedule::interval`] between steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealSchedule {
    order: Vec<Coord2>,
    interval: Duration,
    next: usize,
}

impl RevealSchedule {
    pub fn new(order: Vec<Coord2>, total: Duration) -> Self {
        let steps = u32::try_from(order.len()).unwrap_or(u32::MAX).max(1);
        Self {
            order,
            interval: total / steps,
            next: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn order(&self) -> &[Coord2] {
        &self.order
    }

    pub fn remaining(&self) -> usize {
        self.order.len() - self.next
    }

    pub fn is_done(&self) -> bool {
        self.remaining() == 0
    }

    /// Reveals the next bomb, skipping any the player dealt with in the meantime.
    pub fn step<R: Rng>(&mut self, session: &mut GameSession<R>) -> Option<Coord2> {
        while let Some(&coords) = self.order.get(self.next) {
            self.next += 1;
            if session.reveal_bomb_at(coords) {
                return Some(coords);
            }
        }
        None
    }
}
