//! Submit-time validation of the timebox form.
//!
//! The form hands over raw text: a task name, a newline-delimited checklist
//! (each line optionally decorated with a leading `- `) and a duration in
//! minutes. Nothing is checked while typing; [`FormInput::submit`] turns the
//! text into a typed [`TimeboxRequest`] or a [`ValidationError`].

use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, ValidationError};
use crate::storage::Preset;
use crate::timer::CountdownSession;

/// Decoration put in front of checklist lines for display.
const ITEM_PREFIX: &str = "- ";

/// Split checklist text into items.
///
/// Lines are trimmed, one leading dash decoration is removed, and blank
/// lines are dropped. Text made only of whitespace yields no items.
pub fn parse_checklist(text: &str) -> Vec<String> {
    normalize_checklist(text.lines().map(strip_decoration))
}

fn strip_decoration(line: &str) -> &str {
    let line = line.trim();
    if line == "-" {
        return "";
    }
    line.strip_prefix(ITEM_PREFIX).unwrap_or(line)
}

/// Trim every entry and drop the empty ones, keeping order.
pub fn normalize_checklist<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Render checklist items back into form text, one decorated item per line.
pub fn format_checklist(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{ITEM_PREFIX}{item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a duration in minutes.
pub fn parse_minutes(text: &str) -> Result<f64, ValidationError> {
    let minutes = text
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidDuration(text.to_string()))?;
    validate_minutes(minutes)
}

/// Durations must be finite and strictly positive.
pub fn validate_minutes(minutes: f64) -> Result<f64, ValidationError> {
    if minutes.is_finite() && minutes > 0.0 {
        Ok(minutes)
    } else {
        Err(ValidationError::InvalidDuration(minutes.to_string()))
    }
}

/// Trimmed, non-empty task name.
pub fn validate_task(task: &str) -> Result<String, ValidationError> {
    let task = task.trim();
    if task.is_empty() {
        return Err(ValidationError::EmptyTask);
    }
    Ok(task.to_string())
}

/// Validate a context or preset name and return it trimmed.
///
/// Context names become file stems, so they may not contain path
/// separators or start with a dot.
pub fn validate_name(kind: EntityKind, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let invalid = |reason| ValidationError::InvalidName {
        kind,
        name: name.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if kind == EntityKind::Context {
        if trimmed.contains(['/', '\\']) {
            return Err(invalid("name must not contain path separators"));
        }
        if trimmed.starts_with('.') {
            return Err(invalid("name must not start with '.'"));
        }
    }
    Ok(trimmed.to_string())
}

/// Raw form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub task: String,
    pub checklist_text: String,
    pub minutes_text: String,
}

/// A validated request to start a timebox or save a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeboxRequest {
    pub task: String,
    pub checklist: Vec<String>,
    pub minutes: f64,
}

impl FormInput {
    pub fn new(
        task: impl Into<String>,
        checklist_text: impl Into<String>,
        minutes_text: impl Into<String>,
    ) -> Self {
        Self {
            task: task.into(),
            checklist_text: checklist_text.into(),
            minutes_text: minutes_text.into(),
        }
    }

    /// Re-populate the form from a stored preset, decorating checklist
    /// lines for display.
    pub fn from_preset(preset: &Preset) -> Self {
        Self {
            task: preset.task.clone(),
            checklist_text: format_checklist(&preset.checklist),
            minutes_text: preset.duration_minutes.to_string(),
        }
    }

    /// Validate the form. The duration is checked before the task name.
    pub fn submit(&self) -> Result<TimeboxRequest, ValidationError> {
        let minutes = parse_minutes(&self.minutes_text)?;
        let task = validate_task(&self.task)?;
        Ok(TimeboxRequest {
            task,
            checklist: parse_checklist(&self.checklist_text),
            minutes,
        })
    }

    /// Empty every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_empty() && self.checklist_text.is_empty() && self.minutes_text.is_empty()
    }
}

impl TimeboxRequest {
    /// Start a countdown for this request.
    pub fn start(&self) -> CountdownSession {
        CountdownSession::new(self.task.clone(), self.checklist.clone(), self.minutes)
    }

    /// Turn this request into a storable preset.
    pub fn to_preset(&self) -> Result<Preset, ValidationError> {
        Preset::new(&self.task, &self.checklist, self.minutes)
    }
}
