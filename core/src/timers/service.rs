//! Timer service: handle allocation, callback records and dispatch
//!
//! The service never touches a clock. Scheduling records a callback under a
//! fresh [`TimerId`] and sends a command to the worker; the worker's
//! [`TimerFired`] notifications are routed back through [`dispatch`].
//!
//! Callbacks receive the host that owns the service, so they can reach the
//! rest of the game state without shared ownership.

use std::fmt;
use std::time::Duration;

use hashbrown::HashMap;

use super::protocol::{MAX_TIMER_ID, TimerCommand, TimerFired, TimerId, as_millis};
use super::worker::CommandSender;

/// Owner of a [`TimerService`] whose callbacks run against it.
pub trait TimerHost: Sized + 'static {
    fn timers(&mut self) -> &mut TimerService<Self>;
}

enum TimerCallback<C> {
    Once(Box<dyn FnOnce(&mut C) + Send>),
    Repeating(Box<dyn FnMut(&mut C) + Send>),
    /// Repeating callback lent out while it runs
    Running,
}

struct TimerRecord<C> {
    callback: TimerCallback<C>,
}

impl<C> TimerRecord<C> {
    fn is_repeating(&self) -> bool {
        !matches!(self.callback, TimerCallback::Once(_))
    }
}

/// Schedules one-shot and repeating callbacks on the timer worker.
pub struct TimerService<C> {
    records: HashMap<TimerId, TimerRecord<C>>,
    last_id: u32,
    commands: CommandSender,
}

impl<C> fmt::Debug for TimerService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerService")
            .field("outstanding", &self.records.len())
            .field("last_id", &self.last_id)
            .finish()
    }
}

impl<C> TimerService<C> {
    pub fn new(commands: CommandSender) -> Self {
        Self {
            records: HashMap::new(),
            last_id: 0,
            commands,
        }
    }

    /// Run `callback` once after `delay`, unless cancelled first.
    pub fn schedule_once(
        &mut self,
        delay: Duration,
        callback: impl FnOnce(&mut C) + Send + 'static,
    ) -> TimerId {
        let id = self.next_id();
        self.records.insert(
            id,
            TimerRecord {
                callback: TimerCallback::Once(Box::new(callback)),
            },
        );
        self.send(TimerCommand::Start {
            id,
            delay_ms: as_millis(delay),
        });
        tracing::trace!(%id, ?delay, "scheduled one-shot timer");
        id
    }

    /// Run `callback` after `delay`, then every `interval` until cancelled.
    pub fn schedule_repeating(
        &mut self,
        delay: Duration,
        interval: Duration,
        callback: impl FnMut(&mut C) + Send + 'static,
    ) -> TimerId {
        let id = self.next_id();
        self.records.insert(
            id,
            TimerRecord {
                callback: TimerCallback::Repeating(Box::new(callback)),
            },
        );
        self.send(TimerCommand::Repeat {
            id,
            delay_ms: as_millis(delay),
            interval_ms: as_millis(interval),
        });
        tracing::trace!(%id, ?delay, ?interval, "scheduled repeating timer");
        id
    }

    /// Forget a timer and tell the worker to stop it.
    ///
    /// Absent, fired and already-cancelled handles are a no-op and send nothing.
    pub fn cancel(&mut self, id: impl Into<Option<TimerId>>) {
        let Some(id) = id.into() else { return };
        if self.records.remove(&id).is_some() {
            tracing::trace!(%id, "cancelled timer");
            self.send(TimerCommand::Stop { id });
        }
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn is_repeating(&self, id: TimerId) -> bool {
        self.records.get(&id).is_some_and(TimerRecord::is_repeating)
    }

    /// Number of outstanding timers
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn next_id(&mut self) -> TimerId {
        loop {
            self.last_id = (self.last_id + 1) & MAX_TIMER_ID;
            if self.last_id == 0 {
                self.last_id = 1;
            }
            let id = TimerId::new(self.last_id);
            if !self.records.contains_key(&id) {
                return id;
            }
        }
    }

    fn send(&self, command: TimerCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!(?command, "timer worker is gone, command dropped");
        }
    }

    #[cfg(test)]
    pub(crate) fn set_last_id(&mut self, last_id: u32) {
        self.last_id = last_id;
    }
}

/// Route a firing notification to its callback.
///
/// Unknown handles (cancelled while the notification was in flight, or fired
/// already) are ignored. A one-shot record is removed before its callback
/// runs; a repeating record stays registered and gets its callback back
/// afterwards unless the callback cancelled it.
pub fn dispatch<C: TimerHost>(host: &mut C, fired: TimerFired) {
    let id = fired.id;
    let service = host.timers();
    let Some(record) = service.records.get_mut(&id) else {
        tracing::trace!(%id, "ignoring notification for unknown timer");
        return;
    };

    match std::mem::replace(&mut record.callback, TimerCallback::Running) {
        TimerCallback::Once(callback) => {
            service.records.remove(&id);
            callback(host);
        }
        TimerCallback::Repeating(mut callback) => {
            callback(host);
            if let Some(record) = host.timers().records.get_mut(&id)
                && matches!(record.callback, TimerCallback::Running)
            {
                record.callback = TimerCallback::Repeating(callback);
            }
        }
        TimerCallback::Running => {}
    }
}
