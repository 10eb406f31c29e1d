//! Persistent battery state
//!
//! The estimate survives restarts through a small JSON settings file that is
//! rewritten in full on every save.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed state file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Default state file, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "settings.json";

/// On-disk record; the field name is part of the format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredState {
    #[serde(rename = "BatteryPercentage")]
    battery_percentage: f32,
}

/// Reads and writes the persisted battery percentage
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted percentage
    pub fn load(&self) -> Result<f32, StoreError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let state: StoredState = serde_json::from_str(&contents)?;
        Ok(state.battery_percentage)
    }

    /// Overwrite the state file with the given percentage
    pub fn save(&self, percentage: f32) -> Result<(), StoreError> {
        let state = StoredState {
            battery_percentage: percentage,
        };
        let contents = serde_json::to_string_pretty(&state)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("settings.json"));

        store.save(42.5).unwrap();
        assert_eq!(store.load().unwrap(), 42.5);
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("settings.json"));

        store.save(80.0).unwrap();
        store.save(12.25).unwrap();
        assert_eq!(store.load().unwrap(), 12.25);
    }

    #[test]
    fn test_on_disk_field_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("settings.json"));

        store.save(50.0).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"BatteryPercentage\""));
    }

    #[test]
    fn test_load_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"BatteryPercentage":37.5}"#).unwrap();

        let store = StateStore::new(&path);
        assert_eq!(store.load().unwrap(), 37.5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("settings.json"));

        assert!(matches!(store.load(), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let store = StateStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_load_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"percentage": 50.0}"#).unwrap();

        let store = StateStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state").join("settings.json"));

        store.save(99.0).unwrap();
        assert_eq!(store.load().unwrap(), 99.0);
    }

    #[test]
    fn test_default_path() {
        let store = StateStore::default();
        assert_eq!(store.path(), Path::new(DEFAULT_STATE_FILE));
    }
}
