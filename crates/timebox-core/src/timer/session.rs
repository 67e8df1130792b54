//! Countdown session state machine.
//!
//! A session does not own a clock. The caller (see [`super::SessionDriver`])
//! calls `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Running --(remaining reaches 0)--> Expired
//! ```
//!
//! `Expired` is terminal: further ticks are no-ops. Checklist toggles are
//! allowed in both states and never touch the countdown.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

/// At or below this many remaining seconds the display is in its warning
/// state.
pub const WARNING_THRESHOLD_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Running,
    Expired,
}

/// One definition-of-done row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    pub done: bool,
}

/// Serializable view of a session for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub task: String,
    pub state: SessionState,
    pub remaining_secs: u64,
    pub display: String,
    pub warning: bool,
    pub checklist: Vec<ChecklistItem>,
    pub completed_items: usize,
}

#[derive(Debug, Clone)]
pub struct CountdownSession {
    task: String,
    checklist: Vec<ChecklistItem>,
    duration_secs: u64,
    remaining_secs: u64,
    state: SessionState,
}

impl CountdownSession {
    /// Start a session in `Running` with `floor(minutes * 60)` seconds left.
    ///
    /// Minutes are converted through whole milliseconds first so that
    /// decimal durations such as `0.1` give 6 seconds rather than 5.
    pub fn new(task: impl Into<String>, checklist: Vec<String>, minutes: f64) -> Self {
        let duration_secs = initial_seconds(minutes);
        Self {
            task: task.into(),
            checklist: checklist
                .into_iter()
                .map(|text| ChecklistItem { text, done: false })
                .collect(),
            duration_secs,
            remaining_secs: duration_secs,
            state: SessionState::Running,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    pub fn is_expired(&self) -> bool {
        self.state == SessionState::Expired
    }

    /// Advisory only; has no effect on the countdown.
    pub fn is_warning(&self) -> bool {
        self.remaining_secs <= WARNING_THRESHOLD_SECS
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn display(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }

    pub fn completed_items(&self) -> usize {
        self.checklist.iter().filter(|item| item.done).count()
    }

    /// Every checklist item is checked. Does not end the session.
    pub fn all_done(&self) -> bool {
        self.checklist.iter().all(|item| item.done)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            task: self.task.clone(),
            state: self.state,
            remaining_secs: self.remaining_secs,
            display: self.display(),
            warning: self.is_warning(),
            checklist: self.checklist.clone(),
            completed_items: self.completed_items(),
        }
    }

    pub fn started_event(&self) -> Event {
        Event::SessionStarted {
            task: self.task.clone(),
            duration_secs: self.duration_secs,
            checklist_len: self.checklist.len(),
            at: Utc::now(),
        }
    }

    pub fn abandoned_event(&self) -> Event {
        Event::SessionAbandoned {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance by one second.
    ///
    /// Returns `SessionExpired` on the tick that reaches zero,
    /// `WarningEntered` on the tick that crosses into the last five minutes,
    /// `SessionTick` otherwise, and `None` once expired.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state == SessionState::Expired {
            return None;
        }

        let was_warning = self.is_warning();
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.state = SessionState::Expired;
            return Some(Event::SessionExpired {
                task: self.task.clone(),
                completed_items: self.completed_items(),
                total_items: self.checklist.len(),
                at: Utc::now(),
            });
        }

        if self.is_warning() && !was_warning {
            return Some(Event::WarningEntered {
                remaining_secs: self.remaining_secs,
                display: self.display(),
                at: Utc::now(),
            });
        }

        Some(Event::SessionTick {
            remaining_secs: self.remaining_secs,
            display: self.display(),
            warning: self.is_warning(),
            at: Utc::now(),
        })
    }

    /// Flip the done flag of checklist item `index`.
    pub fn toggle(&mut self, index: usize) -> Result<Event, ValidationError> {
        let len = self.checklist.len();
        let item = self
            .checklist
            .get_mut(index)
            .ok_or(ValidationError::OutOfBounds { index, len })?;
        item.done = !item.done;
        Ok(Event::ItemToggled {
            index,
            text: item.text.clone(),
            done: item.done,
            at: Utc::now(),
        })
    }
}

/// Whole seconds in `minutes`, rounded to the millisecond before flooring.
fn initial_seconds(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    let millis = (minutes * 60_000.0).round() as u64;
    millis / 1000
}

/// Zero-padded `MM:SS`; minutes are not wrapped into hours.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
