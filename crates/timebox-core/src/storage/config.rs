//! JSON-based application configuration.
//!
//! Records where context files live and which context is the default.
//! Stored at `~/.config/timebox/config.json` unless a path is given
//! explicitly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::write_atomic;
use crate::error::StorageError;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Name of the context created on first run.
pub const DEFAULT_CONTEXT: &str = "default";

/// Directory name, next to the config file, used for contexts on first run.
const CONTEXTS_DIR: &str = "contexts";

/// Extension of context files.
const CONTEXT_EXT: &str = "json";

/// Application configuration.
///
/// Serialized to/from JSON as
/// `{ "contextsDirectory": ..., "defaultContextName": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub contexts_directory: PathBuf,
    #[serde(default = "default_context_name")]
    pub default_context_name: String,
}

fn default_context_name() -> String {
    DEFAULT_CONTEXT.into()
}

impl Configuration {
    /// Configuration with the given contexts directory and the `"default"`
    /// context.
    pub fn new(contexts_directory: impl Into<PathBuf>) -> Self {
        Self {
            contexts_directory: contexts_directory.into(),
            default_context_name: default_context_name(),
        }
    }

    /// Defaults for a config file stored at `config_path`: contexts live in a
    /// `contexts/` directory beside it.
    pub fn default_for(config_path: &Path) -> Self {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(base.join(CONTEXTS_DIR))
    }

    /// Load from disk, or create and persist the defaults if the file is
    /// absent. The contexts directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the defaults or the contexts directory cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self, StorageError> {
        let config: Self = match std::fs::read_to_string(path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default_for(path);
                config.save(path)?;
                tracing::info!("created configuration at {}", path.display());
                config
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        std::fs::create_dir_all(&config.contexts_directory).map_err(|source| {
            StorageError::Write {
                path: config.contexts_directory.clone(),
                source,
            }
        })?;
        Ok(config)
    }

    /// Persist to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|source| StorageError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;
        write_atomic(path, &content)
    }

    /// Backing file of the named context.
    pub fn context_path(&self, name: &str) -> PathBuf {
        self.contexts_directory
            .join(format!("{name}.{CONTEXT_EXT}"))
    }

    /// Context name for a file in the contexts directory, if it is one.
    pub(crate) fn context_name_of(path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(CONTEXT_EXT) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() || stem.starts_with('.') {
            return None;
        }
        Some(stem.to_string())
    }
}
