//! Isolated timer worker
//!
//! Runs in its own tokio task so firing accuracy does not depend on how busy
//! the game thread is. All native timing lives here; the rest of the system
//! only sees [`TimerCommand`]s going in and [`TimerFired`] notifications
//! coming out.

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::protocol::{TimerCommand, TimerFired};
use super::queue::TimerQueue;

/// Sender half used by [`TimerService`](super::TimerService)
pub type CommandSender = mpsc::UnboundedSender<TimerCommand>;

/// Receiver half for firing notifications
pub type FiredReceiver = mpsc::UnboundedReceiver<TimerFired>;

/// Background task that owns every armed deadline
pub struct TimerWorker {
    commands: mpsc::UnboundedReceiver<TimerCommand>,
    fired: mpsc::UnboundedSender<TimerFired>,
    queue: TimerQueue,
}

impl TimerWorker {
    /// Create a worker plus the channel ends the service side needs.
    pub fn new() -> (Self, CommandSender, FiredReceiver) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();

        let worker = Self {
            commands: command_rx,
            fired: fired_tx,
            queue: TimerQueue::new(),
        };

        (worker, command_tx, fired_rx)
    }

    /// Run until the command channel closes or nobody listens for notifications.
    pub async fn run(mut self) {
        tracing::debug!("timer worker started");

        loop {
            let next_deadline = self.queue.next_deadline();

            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    tracing::trace!(?command, "timer command");
                    self.queue.apply(command, Instant::now());
                }
                _ = sleep_until(next_deadline) => {
                    if !self.fire_due(Instant::now()) {
                        break;
                    }
                }
            }
        }

        tracing::debug!(outstanding = self.queue.len(), "timer worker stopped");
    }

    /// Send a notification for every due timer; false once the receiver is gone.
    fn fire_due(&mut self, now: Instant) -> bool {
        while let Some((_, id)) = self.queue.pop_due(now) {
            if self.fired.send(TimerFired { id }).is_err() {
                return false;
            }
        }
        true
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::timers::TimerId;

    #[tokio::test(start_paused = true)]
    async fn start_fires_after_delay() {
        let (worker, commands, mut fired) = TimerWorker::new();
        tokio::spawn(worker.run());

        let started = Instant::now();
        commands
            .send(TimerCommand::Start {
                id: TimerId::new(1),
                delay_ms: 250,
            })
            .unwrap();

        let notification = fired.recv().await.unwrap();
        assert_eq!(notification.id, TimerId::new(1));
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_keeps_firing_until_stopped() {
        let (worker, commands, mut fired) = TimerWorker::new();
        tokio::spawn(worker.run());

        let id = TimerId::new(5);
        commands
            .send(TimerCommand::Repeat {
                id,
                delay_ms: 100,
                interval_ms: 50,
            })
            .unwrap();

        for _ in 0..3 {
            assert_eq!(fired.recv().await.unwrap().id, id);
        }

        commands.send(TimerCommand::Stop { id }).unwrap();
        // Anything already in flight is drained; nothing new arrives afterwards.
        tokio::time::sleep(Duration::from_millis(10)).await;
        while fired.try_recv().is_ok() {}

        let late = tokio::time::timeout(Duration::from_millis(500), fired.recv()).await;
        assert!(late.is_err(), "stopped timer kept firing");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_deadline_suppresses_notification() {
        let (worker, commands, mut fired) = TimerWorker::new();
        tokio::spawn(worker.run());

        let id = TimerId::new(2);
        commands.send(TimerCommand::Start { id, delay_ms: 100 }).unwrap();
        commands.send(TimerCommand::Stop { id }).unwrap();

        let late = tokio::time::timeout(Duration::from_millis(300), fired.recv()).await;
        assert!(late.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn worker_exits_when_commands_close() {
        let (worker, commands, _fired) = TimerWorker::new();
        let handle = tokio::spawn(worker.run());

        drop(commands);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should stop")
            .unwrap();
    }
}
