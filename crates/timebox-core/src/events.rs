use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change of a countdown session produces an Event.
/// Front ends render them; the alert collaborator reacts to expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        task: String,
        duration_secs: u64,
        checklist_len: usize,
        at: DateTime<Utc>,
    },
    /// One second elapsed.
    SessionTick {
        remaining_secs: u64,
        display: String,
        warning: bool,
        at: DateTime<Utc>,
    },
    /// Remaining time dropped to five minutes or less.
    WarningEntered {
        remaining_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. Produced exactly once per session.
    SessionExpired {
        task: String,
        completed_items: usize,
        total_items: usize,
        at: DateTime<Utc>,
    },
    ItemToggled {
        index: usize,
        text: String,
        done: bool,
        at: DateTime<Utc>,
    },
    /// Closed before reaching zero.
    SessionAbandoned {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends the countdown.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SessionExpired { .. } | Event::SessionAbandoned { .. }
        )
    }
}
