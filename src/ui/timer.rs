//! One-shot notification timers
//!
//! Scheduling never blocks; it only records a deadline. The runtime asks for
//! [`NotificationTimer::next_deadline`] to bound its input poll and drains
//! [`NotificationTimer::take_due`] afterwards. Timers cannot be cancelled.

use crate::ui::engine::NoteId;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct NotificationTimer {
    pending: Vec<(Instant, NoteId)>,
}

impl NotificationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, note: NoteId) {
        self.pending.push((now + delay, note));
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    /// Remove and return expired timers in deadline order
    pub fn take_due(&mut self, now: Instant) -> Vec<NoteId> {
        let mut due: Vec<(Instant, NoteId)> = Vec::new();
        self.pending.retain(|&(at, note)| {
            if at <= now {
                due.push((at, note));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, note)| note).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
