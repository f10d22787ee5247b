//! Application state persistence with file locking.
//!
//! The entire local store is one JSON document: profile, deck collection,
//! and full session history. It is restored wholesale on load and replaced
//! atomically on save. Deleting the file resets the app to defaults.

use crate::{catalog, Deck, Error, Result, UserProfile, WorkoutSession};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The persisted application state
///
/// Passed explicitly to whichever component needs it; there is no ambient
/// global. The session engine's active session is transient and deliberately
/// not part of this document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub user: UserProfile,
    pub decks: Vec<Deck>,
    pub sessions: Vec<WorkoutSession>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: UserProfile::starter(),
            decks: catalog::get_default_catalog().starter_decks.clone(),
            sessions: Vec::new(),
        }
    }
}

impl AppState {
    /// Read the store document under a shared lock.
    ///
    /// A missing, unreadable, or corrupt file never blocks startup: each of
    /// those cases logs a warning and falls back to the default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No store file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open store file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock store file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read store file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<AppState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded app state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse store file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Replace the store document on disk.
    ///
    /// The JSON goes to a locked temp file in the same directory, gets
    /// synced, then renames over the old store so readers never observe a
    /// half-written document.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Temp file must live next to the store for the rename to be atomic
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved app state to {:?}", path);
        Ok(())
    }

    /// Apply a mutation to the store: load, run `f`, write back.
    ///
    /// If `f` fails the store file is left untouched.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut AppState) -> Result<()>,
    {
        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }

    /// Reset the local store back to defaults, removing the file if present
    pub fn clear(path: &Path) -> Result<Self> {
        if path.exists() {
            std::fs::remove_file(path)?;
            tracing::info!("Cleared local store at {:?}", path);
        }
        Ok(Self::default())
    }

    /// Rename the profile; empty or whitespace-only names are rejected
    pub fn rename_user(&mut self, username: &str) -> Result<()> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("Username cannot be empty".into()));
        }
        self.user.username = trimmed.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_has_starter_content() {
        let state = AppState::default();
        assert_eq!(state.user.username, "Athlete");
        assert_eq!(state.user.total_xp, 0);
        assert_eq!(state.decks.len(), 3);
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("gymdeck.json");

        let mut state = AppState::default();
        state.user.total_xp = 75;
        state.user.total_workouts = 1;

        state.save(&store_path).unwrap();
        let loaded = AppState::load(&store_path).unwrap();

        assert_eq!(loaded.user.total_xp, 75);
        assert_eq!(loaded.user.total_workouts, 1);
        assert_eq!(loaded.decks.len(), 3);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("nonexistent.json");

        let state = AppState::load(&store_path).unwrap();
        assert_eq!(state.user.total_xp, 0);
        assert_eq!(state.decks.len(), 3);
    }

    #[test]
    fn test_corrupted_store_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("corrupted.json");

        std::fs::write(&store_path, "{ invalid json }").unwrap();

        let state = AppState::load(&store_path).unwrap();
        assert_eq!(state.user.username, "Athlete");
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("gymdeck.json");

        AppState::default().save(&store_path).unwrap();

        AppState::update(&store_path, |state| {
            state.user.total_xp += 100;
            Ok(())
        })
        .unwrap();

        let loaded = AppState::load(&store_path).unwrap();
        assert_eq!(loaded.user.total_xp, 100);
    }

    #[test]
    fn test_clear_resets_to_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("gymdeck.json");

        let mut state = AppState::default();
        state.user.total_xp = 500;
        state.decks.clear();
        state.save(&store_path).unwrap();

        let fresh = AppState::clear(&store_path).unwrap();
        assert!(!store_path.exists());
        assert_eq!(fresh.user.total_xp, 0);
        assert_eq!(fresh.decks.len(), 3);
    }

    #[test]
    fn test_rename_user_rejects_empty() {
        let mut state = AppState::default();
        assert!(state.rename_user("   ").is_err());
        state.rename_user("  IronLifter  ").unwrap();
        assert_eq!(state.user.username, "IronLifter");
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("gymdeck.json");

        AppState::default().save(&store_path).unwrap();

        assert!(store_path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "gymdeck.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only gymdeck.json, found extras: {:?}",
            extras
        );
    }
}
