//! Core error types for timebox-core.
//!
//! Every failure is one of four user-facing categories: bad input
//! ([`ValidationError`]), a name collision ([`CoreError::Duplicate`]), an
//! attempt to delete the default context ([`CoreError::Protected`]), or an
//! environment problem while touching disk ([`StorageError`]).

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which kind of named entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Context,
    Preset,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Context => f.write_str("Context"),
            EntityKind::Preset => f.write_str("Preset"),
        }
    }
}

/// Core error type for timebox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad user input; nothing was changed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A context or preset with this name already exists.
    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: EntityKind, name: String },

    /// The default context can never be deleted.
    #[error("Context '{0}' is the default context and cannot be deleted")]
    Protected(String),

    /// The named context or preset does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    /// Disk access failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Input validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task name must not be empty")]
    EmptyTask,

    #[error("Invalid duration '{0}': expected a positive number of minutes")]
    InvalidDuration(String),

    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: EntityKind,
        name: String,
        reason: &'static str,
    },

    /// Out of bounds
    #[error("Index {index} out of bounds for checklist (length: {len})")]
    OutOfBounds { index: usize, len: usize },
}

/// Filesystem and serialization failures.
///
/// Every persist is all-or-nothing, so seeing one of these means the file on
/// disk still holds its previous content.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
