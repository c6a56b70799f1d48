//! Durable storage for tracker state.
//!
//! The whole [`TrackerState`] is written as one JSON document after every
//! update. Writes go to a sibling temp file first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::HotspotError;
use crate::types::TrackerState;

/// JSON-file backed snapshot of the tracker state.
#[derive(Debug, Clone)]
pub struct HotspotStore {
    path: PathBuf,
}

impl HotspotStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a state file currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the stored snapshot.
    ///
    /// Returns `Ok(None)` when no state file exists.
    pub fn load(&self) -> Result<Option<TrackerState>, HotspotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut state: TrackerState = serde_json::from_slice(&bytes)?;
        state.normalize();
        debug!(
            path = ?self.path,
            topics = state.topics.len(),
            history = state.history.len(),
            "Loaded hotspot state"
        );
        Ok(Some(state))
    }

    /// Read the stored snapshot, falling back to the empty state.
    ///
    /// Unreadable or corrupt files are logged and treated as absent.
    pub fn load_or_default(&self) -> TrackerState {
        match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => TrackerState::default(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to load session cache, starting empty");
                TrackerState::default()
            }
        }
    }

    /// Write the full snapshot.
    pub fn save(&self, state: &TrackerState) -> Result<(), HotspotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, bytes)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!(path = ?self.path, "Saved hotspot state");
        Ok(())
    }

    /// Delete the state file.
    ///
    /// Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool, HotspotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = ?self.path, "Removed hotspot state");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TopicRecord;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_state() -> TrackerState {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut state = TrackerState::default();
        let mut record = TopicRecord::new("github", now);
        record.mention_count = 2;
        record.heat = 1.28;
        state.topics.insert("github".to_string(), record);
        state.last_update_at = Some(now);
        state
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = HotspotStore::new(dir.path().join("state.json"));

        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
        assert!(store.load_or_default().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = HotspotStore::new(dir.path().join("state.json"));
        let state = sample_state();

        store.save(&state).unwrap();
        assert!(store.exists());
        assert!(!dir.path().join("state.json.tmp").exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = HotspotStore::new(dir.path().join("nested/deeper/state.json"));

        store.save(&TrackerState::default()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_corrupt_file_degrades_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let store = HotspotStore::new(&path);

        assert!(matches!(store.load(), Err(HotspotError::Serialization(_))));
        assert!(store.load_or_default().is_empty());
    }

    #[test]
    fn test_reset() {
        let dir = TempDir::new().unwrap();
        let store = HotspotStore::new(dir.path().join("state.json"));

        assert!(!store.reset().unwrap());
        store.save(&sample_state()).unwrap();
        assert!(store.reset().unwrap());
        assert!(!store.exists());
        assert!(store.load_or_default().is_empty());
    }

    #[test]
    fn test_save_into_directory_path_fails() {
        let dir = TempDir::new().unwrap();
        // The target is an existing directory, so the rename cannot succeed.
        let store = HotspotStore::new(dir.path());

        assert!(store.save(&TrackerState::default()).is_err());
    }
}
