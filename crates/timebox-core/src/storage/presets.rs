//! Preset documents: one JSON object per context mapping preset name to
//! `{ "task", "dod", "minutes" }`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::write_atomic;
use crate::error::{StorageError, ValidationError};
use crate::form::{normalize_checklist, validate_minutes, validate_task};

/// A saved task, checklist and duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub task: String,
    /// Definition-of-done items, in order.
    #[serde(rename = "dod", default)]
    pub checklist: Vec<String>,
    #[serde(rename = "minutes")]
    pub duration_minutes: f64,
}

/// All presets of one context, keyed by name.
pub type PresetMap = BTreeMap<String, Preset>;

impl Preset {
    /// Build a validated preset.
    ///
    /// The task is trimmed and must be non-empty, the duration must be a
    /// finite positive number, and checklist entries are trimmed with blank
    /// entries dropped.
    pub fn new<I, S>(task: &str, checklist: I, duration_minutes: f64) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let duration_minutes = validate_minutes(duration_minutes)?;
        let task = validate_task(task)?;
        Ok(Self {
            task,
            checklist: normalize_checklist(checklist),
            duration_minutes,
        })
    }
}

/// Read a context document. A missing file is an empty map.
pub fn load_presets(path: &Path) -> Result<PresetMap, StorageError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no preset file at {}, starting empty", path.display());
            return Ok(PresetMap::new());
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(PresetMap::new());
    }

    serde_json::from_str(&content).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a whole context document, replacing the previous one atomically.
pub fn save_presets(path: &Path, presets: &PresetMap) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(presets).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &content)
}
