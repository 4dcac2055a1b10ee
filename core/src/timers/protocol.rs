//! Message protocol between the timer service and the timer worker
//!
//! Commands flow service → worker, notifications flow worker → service.
//! Both directions are plain records so the shape matches the JSON wire form:
//!
//! ```text
//! {"action":"START","id":7,"delay":800}
//! {"action":"REPEAT","id":8,"delay":800,"interval":470}
//! {"action":"STOP","id":8}
//! {"id":7}
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest handle the id counter produces before wrapping back to 1.
pub const MAX_TIMER_ID: u32 = 0x7FFF_FFFF;

/// Opaque handle for a scheduled timer.
///
/// Unique among outstanding timers; a value is only handed out again after the
/// timer it named has fired (one-shot) or been stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(u32);

impl TimerId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Instruction sent to the timer worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum TimerCommand {
    /// Fire once after `delay_ms`
    Start {
        id: TimerId,
        #[serde(rename = "delay")]
        delay_ms: u64,
    },

    /// Fire after `delay_ms`, then every `interval_ms` until stopped
    Repeat {
        id: TimerId,
        #[serde(rename = "delay")]
        delay_ms: u64,
        #[serde(rename = "interval")]
        interval_ms: u64,
    },

    /// Forget the timer; stopping an unknown id is not an error
    Stop { id: TimerId },
}

impl TimerCommand {
    pub fn id(&self) -> TimerId {
        match *self {
            TimerCommand::Start { id, .. }
            | TimerCommand::Repeat { id, .. }
            | TimerCommand::Stop { id } => id,
        }
    }
}

/// Notification that a timer reached its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFired {
    pub id: TimerId,
}

pub(crate) fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_use_the_action_record_shape() {
        let start = TimerCommand::Start {
            id: TimerId::new(3),
            delay_ms: 800,
        };
        assert_eq!(
            serde_json::to_value(start).unwrap(),
            json!({ "action": "START", "id": 3, "delay": 800 })
        );

        let repeat = TimerCommand::Repeat {
            id: TimerId::new(4),
            delay_ms: 800,
            interval_ms: 470,
        };
        assert_eq!(
            serde_json::to_value(repeat).unwrap(),
            json!({ "action": "REPEAT", "id": 4, "delay": 800, "interval": 470 })
        );

        let stop: TimerCommand =
            serde_json::from_value(json!({ "action": "STOP", "id": 4 })).unwrap();
        assert_eq!(stop, TimerCommand::Stop { id: TimerId::new(4) });
    }

    #[test]
    fn notification_carries_only_the_id() {
        let fired = TimerFired { id: TimerId::new(9) };
        assert_eq!(serde_json::to_value(fired).unwrap(), json!({ "id": 9 }));
    }

    #[test]
    fn misspelled_action_is_rejected() {
        let parsed = serde_json::from_value::<TimerCommand>(
            json!({ "action": "REPAEAT", "id": 1, "delay": 1, "interval": 1 }),
        );
        assert!(parsed.is_err());
    }
}
