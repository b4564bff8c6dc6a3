//! Device-local persistence: two independent JSON files under the app
//! data directory, last-write-wins, no versioning or migration.
//!
//! `profile.json` holds the serialized `UserProfile`; `theme.json` holds
//! the theme preference. A missing or unreadable file loads as `None` so
//! a corrupted save never blocks startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config;
use crate::models::{Theme, UserProfile};

const PROFILE_FILE: &str = "profile.json";
const THEME_FILE: &str = "theme.json";

/// Errors from the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store scoped to the device.
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the standard app data directory.
    pub fn default_location() -> Self {
        Self::new(config::app_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        self.load_json(PROFILE_FILE)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.save_json(PROFILE_FILE, profile)
    }

    pub fn load_theme(&self) -> Result<Option<Theme>, StorageError> {
        self.load_json(THEME_FILE)
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.save_json(THEME_FILE, &theme)
    }

    // ── Internal ────────────────────────────────────────────

    fn load_json<T: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<Option<T>, StorageError> {
        let path = self.dir.join(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(file, error = %e, "Discarding unreadable stored value");
                Ok(None)
            }
        }
    }

    fn save_json<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(file), raw)?;
        Ok(())
    }
}
