//! Flat JSON document persistence.
//!
//! Two independent documents live in the data directory:
//! - `config.json`: user configuration ([`AppConfig`])
//! - `stats.json`: stand-up statistics (see [`crate::stats`])
//!
//! Every read loads the whole document and every write replaces it. A missing
//! or malformed document reads as its default without surfacing an error, and
//! a single malformed field reads as that field's default (see [`lenient`]).
//! Writes merge over whatever object is already on disk, so keys this version
//! does not know about survive a save.

pub mod config;
pub mod error;
pub mod lenient;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub use config::{AppConfig, ConfigStore};
pub use error::{Result, StoreError};

/// Environment variable that relocates the data directory.
pub const HOME_ENV: &str = "STANDUP_HOME";

/// Directory name under `~/.config`.
const APP_DIR: &str = "standup_reminder";

/// Returns the data directory, creating it if needed.
///
/// Defaults to `~/.config/standup_reminder`; `STANDUP_HOME` overrides it.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or the
/// directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or(StoreError::HomeDirectoryNotFound)?
            .join(".config")
            .join(APP_DIR),
    };

    fs::create_dir_all(&dir).map_err(|source| StoreError::DirectoryCreation {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

// ============================================================================
// JsonStore
// ============================================================================

/// A single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a store for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, falling back to `T::default()` when the file is
    /// absent or does not parse.
    pub fn load<T>(&self) -> T
    where
        T: DeserializeOwned + Default,
    {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed document");
                    T::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => T::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable document");
                T::default()
            }
        }
    }

    /// Writes `record` over the document, keeping keys already on disk that
    /// the record does not set.
    ///
    /// # Errors
    /// Returns an error if serialization or the file write fails.
    pub fn save<T>(&self, record: &T) -> Result<()>
    where
        T: Serialize,
    {
        let Value::Object(fields) = serde_json::to_value(record).map_err(StoreError::Serialize)?
        else {
            return Err(StoreError::NotAnObject(self.path.clone()));
        };

        let mut merged = self.load_object();
        merged.extend(fields);

        let text =
            serde_json::to_string_pretty(&Value::Object(merged)).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::DirectoryCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "Document saved");
        Ok(())
    }

    /// Reads the document as a raw object; anything else reads as empty.
    fn load_object(&self) -> Map<String, Value> {
        match self.load::<Value>() {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
