//! Deterministic stand-in for the timer worker in tests
//!
//! Feeds the commands a [`TimerService`](super::TimerService) sends into a
//! [`TimerQueue`] and steps virtual time, dispatching each due timer in order.
//! Commands sent by a callback are applied at that callback's deadline.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::protocol::{TimerCommand, TimerFired, TimerId};
use super::queue::TimerQueue;
use super::service::{TimerHost, dispatch};
use super::worker::CommandSender;

pub struct VirtualClock {
    commands: mpsc::UnboundedReceiver<TimerCommand>,
    queue: TimerQueue,
    start: Instant,
    now: Instant,
    /// Every command seen so far, in order
    pub sent: Vec<TimerCommand>,
    /// Every timer dispatched so far with its virtual time in ms
    pub fired: Vec<(u64, TimerId)>,
}

impl VirtualClock {
    pub fn new() -> (Self, CommandSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let clock = Self {
            commands: rx,
            queue: TimerQueue::new(),
            start,
            now: start,
            sent: Vec::new(),
            fired: Vec::new(),
        };
        (clock, tx)
    }

    /// Virtual milliseconds since the clock was created
    pub fn elapsed_ms(&self) -> u64 {
        (self.now - self.start).as_millis() as u64
    }

    /// Apply every command sent so far at the current virtual time.
    pub fn pump(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.sent.push(command);
            self.queue.apply(command, self.now);
        }
    }

    /// Step virtual time forward, firing everything that comes due.
    pub fn advance<C: TimerHost>(&mut self, host: &mut C, ms: u64) {
        let target = self.now + Duration::from_millis(ms);
        loop {
            self.pump();
            let Some((deadline, id)) = self.queue.pop_due(target) else { break };
            self.now = deadline;
            self.fired.push((self.elapsed_ms(), id));
            dispatch(host, TimerFired { id });
        }
        self.now = target;
        self.pump();
    }

    /// Advance to an absolute virtual time.
    pub fn advance_to<C: TimerHost>(&mut self, host: &mut C, at_ms: u64) {
        let now = self.elapsed_ms();
        assert!(at_ms >= now, "cannot go back from {now}ms to {at_ms}ms");
        self.advance(host, at_ms - now);
    }

    /// Deliver a notification directly, as if it had been in flight.
    pub fn deliver<C: TimerHost>(&mut self, host: &mut C, id: TimerId) {
        dispatch(host, TimerFired { id });
        self.pump();
    }

    pub fn stops_sent(&self) -> usize {
        self.sent
            .iter()
            .filter(|c| matches!(c, TimerCommand::Stop { .. }))
            .count()
    }

    pub fn armed(&self) -> usize {
        self.queue.len()
    }
}
