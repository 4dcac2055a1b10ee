//! Timer system
//!
//! This module provides:
//! - **Protocol**: commands and notifications exchanged with the worker
//! - **Worker**: isolated tokio task that owns every native deadline
//! - **Service**: handle allocation, callback records and dispatch
//!
//! # Lifecycle
//!
//! 1. `schedule_once` / `schedule_repeating` → record stored, `START`/`REPEAT` sent
//! 2. Worker deadline passes → `TimerFired { id }` sent back
//! 3. [`dispatch`] runs the callback (one-shot records are removed first)
//! 4. `cancel` → record removed, `STOP` sent; late notifications are ignored

mod protocol;
mod queue;
mod service;
mod worker;

#[cfg(test)]
pub(crate) mod virtual_clock;


pub use protocol::{MAX_TIMER_ID, TimerCommand, TimerFired, TimerId};
pub use queue::TimerQueue;
pub use service::{TimerHost, TimerService, dispatch};
pub use worker::{CommandSender, FiredReceiver, TimerWorker};
