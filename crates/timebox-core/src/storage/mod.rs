mod config;
mod presets;
mod store;

pub use config::{Configuration, CONFIG_FILE, DEFAULT_CONTEXT};
pub use presets::{load_presets, save_presets, Preset, PresetMap};
pub use store::{ContextSwitch, PresetStore};

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Returns `~/.config/timebox/`.
///
/// Falls back to the current directory when no home directory can be
/// determined.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("timebox")
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

/// Write `content` to a sibling temp file and rename it over `path`.
///
/// Either the whole new content lands or the old file stays as it was.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("timebox"),
        std::process::id()
    );
    let tmp_path = path
        .parent()
        .map(|p| p.join(&tmp_name))
        .unwrap_or_else(|| PathBuf::from(&tmp_name));

    std::fs::write(&tmp_path, content).map_err(|source| StorageError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    if let Err(source) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::Rename {
            from: tmp_path,
            to: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_content_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.json");

        write_atomic(&path, "{}").unwrap();
        write_atomic(&path, "{\"a\":1}").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1}");
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn default_config_path_is_under_data_dir() {
        assert!(default_config_path().starts_with(data_dir()));
        assert!(default_config_path().ends_with("config.json"));
    }
}
