//! Deadline queue owned by the timer worker
//!
//! Holds no clock of its own: callers pass `now` in, so the same queue drives
//! the real worker and virtual-time test drivers.

use std::collections::BTreeSet;
use std::time::Duration;

use hashbrown::HashMap;
use tokio::time::Instant;

use super::protocol::{TimerCommand, TimerId};

/// Repeat intervals are clamped to this so a zero interval cannot spin.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct Armed {
    deadline: Instant,
    seq: u64,
    interval: Option<Duration>,
}

/// Outstanding deadlines keyed by timer id.
///
/// Ties on the deadline are broken by arming order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    armed: HashMap<TimerId, Armed>,
    order: BTreeSet<(Instant, u64, TimerId)>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command received at `now`.
    pub fn apply(&mut self, command: TimerCommand, now: Instant) {
        match command {
            TimerCommand::Start { id, delay_ms } => {
                self.arm(id, now + Duration::from_millis(delay_ms), None);
            }
            TimerCommand::Repeat {
                id,
                delay_ms,
                interval_ms,
            } => {
                let interval = Duration::from_millis(interval_ms).max(MIN_INTERVAL);
                self.arm(id, now + Duration::from_millis(delay_ms), Some(interval));
            }
            TimerCommand::Stop { id } => {
                self.disarm(id);
            }
        }
    }

    /// Earliest outstanding deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.order.first().map(|&(deadline, _, _)| deadline)
    }

    /// Pop the earliest timer whose deadline is at or before `now`.
    ///
    /// One-shot timers are forgotten; repeating timers are re-armed one
    /// interval after the deadline they just hit.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, TimerId)> {
        let &(deadline, seq, id) = self.order.first()?;
        if deadline > now {
            return None;
        }
        self.order.remove(&(deadline, seq, id));
        let armed = self.armed.remove(&id)?;
        if let Some(interval) = armed.interval {
            self.arm(id, deadline + interval, Some(interval));
        }
        Some((deadline, id))
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.armed.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    fn arm(&mut self, id: TimerId, deadline: Instant, interval: Option<Duration>) {
        self.disarm(id);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.armed.insert(
            id,
            Armed {
                deadline,
                seq,
                interval,
            },
        );
        self.order.insert((deadline, seq, id));
    }

    fn disarm(&mut self, id: TimerId) {
        if let Some(armed) = self.armed.remove(&id) {
            self.order.remove(&(armed.deadline, armed.seq, id));
        }
    }
}
