//! Preset store: contexts on disk plus the active context's presets in
//! memory.
//!
//! - One JSON document per context under the configured contexts directory
//! - Every mutation is flushed before the in-memory state changes
//! - The configured default context can never be deleted

use std::path::{Path, PathBuf};

use super::config::Configuration;
use super::presets::{load_presets, save_presets, Preset, PresetMap};
use super::{default_config_path, DEFAULT_CONTEXT};
use crate::error::{CoreError, EntityKind, Result, StorageError};
use crate::form::validate_name;

/// Result of [`PresetStore::switch_context`].
///
/// On `Switched` the caller clears any in-progress form state.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSwitch {
    Unchanged,
    Switched,
}

/// Durable CRUD over presets, scoped by context.
#[derive(Debug)]
pub struct PresetStore {
    config_path: PathBuf,
    config: Configuration,
    active: String,
    presets: PresetMap,
}

impl PresetStore {
    /// Open the store at the default configuration path.
    pub fn open() -> Result<Self> {
        Self::open_at(default_config_path())
    }

    /// Open the store with the configuration file at `config_path`,
    /// creating it with defaults on first run. The configured default
    /// context becomes active.
    pub fn open_at(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        let config = Configuration::load_or_create(&config_path)?;
        let active = config.default_context_name.clone();

        let context_path = config.context_path(&active);
        let presets = load_presets(&context_path)?;
        if !context_path.exists() {
            save_presets(&context_path, &presets)?;
            tracing::info!("created context '{active}'");
        }
        tracing::debug!(
            "opened store at {} with {} presets in '{active}'",
            config_path.display(),
            presets.len()
        );

        Ok(Self {
            config_path,
            config,
            active,
            presets,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn active_context(&self) -> &str {
        &self.active
    }

    pub fn default_context(&self) -> &str {
        &self.config.default_context_name
    }

    /// Presets of the active context.
    pub fn presets(&self) -> &PresetMap {
        &self.presets
    }

    pub fn get_preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name.trim())
    }

    /// Like [`get_preset`](Self::get_preset), but a missing preset is a
    /// [`CoreError::NotFound`].
    pub fn require_preset(&self, name: &str) -> Result<&Preset> {
        let name = name.trim();
        self.presets.get(name).ok_or_else(|| CoreError::NotFound {
            kind: EntityKind::Preset,
            name: name.to_string(),
        })
    }

    /// Context names from the files in the contexts directory, sorted.
    /// `"default"` is implied when there are none.
    pub fn list_contexts(&self) -> Result<Vec<String>> {
        let dir = &self.config.contexts_directory;
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(vec![DEFAULT_CONTEXT.to_string()])
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: dir.clone(),
                    source,
                }
                .into())
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StorageError::Read {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = Configuration::context_name_of(&path) {
                names.push(name);
            }
        }

        if names.is_empty() {
            names.push(DEFAULT_CONTEXT.to_string());
        }
        names.sort();
        Ok(names)
    }

    pub fn context_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_contexts()?.iter().any(|c| c == name))
    }

    // ── Contexts ─────────────────────────────────────────────────────

    /// Create an empty context and make it active.
    pub fn create_context(&mut self, name: &str) -> Result<()> {
        let name = validate_name(EntityKind::Context, name)?;
        if self.context_exists(&name)? {
            return Err(CoreError::Duplicate {
                kind: EntityKind::Context,
                name,
            });
        }

        let presets = PresetMap::new();
        self.save_presets(&name, &presets)?;
        tracing::info!("created context '{name}'");

        self.active = name;
        self.presets = presets;
        Ok(())
    }

    /// Make `name` the active context, replacing the in-memory presets.
    pub fn switch_context(&mut self, name: &str) -> Result<ContextSwitch> {
        let name = validate_name(EntityKind::Context, name)?;
        if name == self.active {
            return Ok(ContextSwitch::Unchanged);
        }
        if !self.context_exists(&name)? {
            return Err(CoreError::NotFound {
                kind: EntityKind::Context,
                name,
            });
        }

        let presets = self.load_presets(&name)?;
        tracing::info!("switched context '{}' -> '{name}'", self.active);
        self.active = name;
        self.presets = presets;
        Ok(ContextSwitch::Switched)
    }

    /// Rename a context's backing file. The default pointer and the active
    /// context follow the rename.
    pub fn rename_context(&mut self, old: &str, new: &str) -> Result<()> {
        let old = validate_name(EntityKind::Context, old)?;
        let new = validate_name(EntityKind::Context, new)?;
        if self.context_exists(&new)? {
            return Err(CoreError::Duplicate {
                kind: EntityKind::Context,
                name: new,
            });
        }

        let from = self.config.context_path(&old);
        if !from.is_file() {
            return Err(CoreError::NotFound {
                kind: EntityKind::Context,
                name: old,
            });
        }
        let to = self.config.context_path(&new);
        std::fs::rename(&from, &to).map_err(|source| StorageError::Rename {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        if self.config.default_context_name == old {
            let mut config = self.config.clone();
            config.default_context_name = new.clone();
            if let Err(e) = config.save(&self.config_path) {
                if let Err(undo) = std::fs::rename(&to, &from) {
                    tracing::error!("failed to restore {}: {undo}", from.display());
                }
                return Err(e.into());
            }
            self.config = config;
        }

        if self.active == old {
            self.active = new.clone();
        }
        tracing::info!("renamed context '{old}' -> '{new}'");
        Ok(())
    }

    /// Delete a context's backing file. If it was active, another context
    /// (the first in sorted order, or `"default"`) becomes active.
    pub fn delete_context(&mut self, name: &str) -> Result<()> {
        let name = validate_name(EntityKind::Context, name)?;
        if name == self.config.default_context_name {
            return Err(CoreError::Protected(name));
        }

        let path = self.config.context_path(&name);
        if !path.is_file() {
            return Err(CoreError::NotFound {
                kind: EntityKind::Context,
                name,
            });
        }

        // Resolve and load the fallback before the file goes away.
        let fallback = if self.active == name {
            let fallback = self
                .list_contexts()?
                .into_iter()
                .find(|c| *c != name)
                .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());
            let presets = self.load_presets(&fallback)?;
            Some((fallback, presets))
        } else {
            None
        };

        std::fs::remove_file(&path).map_err(|source| StorageError::Delete {
            path: path.clone(),
            source,
        })?;
        tracing::info!("deleted context '{name}'");

        if let Some((fallback, presets)) = fallback {
            tracing::warn!("active context '{name}' deleted, falling back to '{fallback}'");
            self.active = fallback;
            self.presets = presets;
        }
        Ok(())
    }

    /// Point the configured default at the active context.
    pub fn set_default_context(&mut self) -> Result<()> {
        let mut config = self.config.clone();
        config.default_context_name = self.active.clone();
        config.save(&self.config_path)?;
        self.config = config;
        tracing::info!("default context set to '{}'", self.active);
        Ok(())
    }

    // ── Presets ──────────────────────────────────────────────────────

    /// Read a context's whole preset map. A missing file is an empty map.
    pub fn load_presets(&self, context: &str) -> Result<PresetMap> {
        Ok(load_presets(&self.config.context_path(context))?)
    }

    /// Replace a context's whole preset map on disk.
    pub fn save_presets(&self, context: &str, presets: &PresetMap) -> Result<()> {
        Ok(save_presets(&self.config.context_path(context), presets)?)
    }

    /// Insert or overwrite a preset in the active context and flush.
    pub fn upsert_preset<I, S>(
        &mut self,
        name: &str,
        task: &str,
        checklist: I,
        duration_minutes: f64,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let preset = Preset::new(task, checklist, duration_minutes)?;
        let name = validate_name(EntityKind::Preset, name)?;

        let mut presets = self.presets.clone();
        presets.insert(name.clone(), preset);
        self.save_presets(&self.active, &presets)?;
        tracing::info!("saved preset '{name}' in '{}'", self.active);

        self.presets = presets;
        Ok(())
    }

    /// Remove a preset from the active context and flush. Returns whether it
    /// existed; a missing preset is a no-op.
    pub fn delete_preset(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if !self.presets.contains_key(name) {
            tracing::debug!("preset '{name}' not in '{}', nothing to delete", self.active);
            return Ok(false);
        }

        let mut presets = self.presets.clone();
        presets.remove(name);
        self.save_presets(&self.active, &presets)?;
        tracing::info!("deleted preset '{name}' from '{}'", self.active);

        self.presets = presets;
        Ok(true)
    }
}
