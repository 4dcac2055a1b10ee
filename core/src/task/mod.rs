//! Cancellable, at-most-once deferred work
//!
//! A [`Task`] wraps one job. The job runs exactly once if the task is ever
//! executed, whichever path gets there first:
//! - [`Task::do_now`] runs it immediately
//! - [`Task::do_after`] runs it when a one-shot timer fires; calling it again
//!   replaces the previous timer, so the last call wins
//! - [`do_all_pending`] runs every task still pending
//!
//! Once executed a task is done and every further call on it is a no-op.
//! Callers use this to re-arm timeouts freely and to flush all deferred
//! cleanup in one place.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::timers::{TimerHost, TimerId};

#[cfg(test)]
mod task_tests;

/// Owner of a [`TaskRegistry`]; tasks schedule through the host's timers.
pub trait TaskHost: TimerHost {
    fn tasks(&mut self) -> &mut TaskRegistry<Self>;
}

/// Handle to a task in its host's registry.
///
/// Handles are ordered by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Task(u64);

struct PendingTask<C> {
    job: Box<dyn FnOnce(&mut C) + Send>,
    timer: Option<TimerId>,
}

/// Every task that has not run yet.
pub struct TaskRegistry<C> {
    pending: BTreeMap<Task, PendingTask<C>>,
    next_id: u64,
}

impl<C> Default for TaskRegistry<C> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<C> fmt::Debug for TaskRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<C> TaskRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, task: Task) -> bool {
        self.pending.contains_key(&task)
    }

    /// Timer currently armed for the task, if any
    pub fn timer_of(&self, task: Task) -> Option<TimerId> {
        self.pending.get(&task).and_then(|p| p.timer)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn insert(&mut self, job: Box<dyn FnOnce(&mut C) + Send>) -> Task {
        let task = Task(self.next_id);
        self.next_id += 1;
        self.pending.insert(task, PendingTask { job, timer: None });
        task
    }
}

impl Task {
    /// Register a pending task holding `job`.
    pub fn create<C: TaskHost>(host: &mut C, job: impl FnOnce(&mut C) + Send + 'static) -> Task {
        host.tasks().insert(Box::new(job))
    }

    /// Run the job now if the task is still pending.
    ///
    /// The task leaves the registry and its timer is cancelled before the job
    /// runs, so the job may freely create or drain other tasks.
    pub fn do_now<C: TaskHost>(self, host: &mut C) {
        let Some(pending) = host.tasks().pending.remove(&self) else {
            return;
        };
        host.timers().cancel(pending.timer);
        (pending.job)(host);
    }

    /// Run the job after `delay`, superseding any earlier `do_after`.
    pub fn do_after<C: TaskHost>(self, host: &mut C, delay: Duration) {
        let Some(previous) = host.tasks().pending.get(&self).map(|p| p.timer) else {
            return;
        };
        host.timers().cancel(previous);

        let timer = host
            .timers()
            .schedule_once(delay, move |host: &mut C| self.do_now(host));
        if let Some(pending) = host.tasks().pending.get_mut(&self) {
            pending.timer = Some(timer);
        }
    }

    pub fn is_pending<C: TaskHost>(self, host: &mut C) -> bool {
        host.tasks().contains(self)
    }
}

/// Run every task pending at call time, in creation order.
///
/// Works from a snapshot: tasks created by jobs during the drain stay pending,
/// and tasks already run by an earlier job in the drain are skipped.
pub fn do_all_pending<C: TaskHost>(host: &mut C) {
    let snapshot: Vec<Task> = host.tasks().pending.keys().copied().collect();
    if !snapshot.is_empty() {
        tracing::trace!(count = snapshot.len(), "draining pending tasks");
    }
    for task in snapshot {
        task.do_now(host);
    }
}
