//! User configuration document.
//!
//! Stored at `<data dir>/config.json`:
//!
//! ```json
//! {
//!   "interval": "30 minutes",
//!   "user_id": "5f0c…",
//!   "notification_prompt_shown": true,
//!   "last_update_check": 1767225600
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{lenient, JsonStore, Result};
use crate::types::Interval;

/// File name of the configuration document.
pub const CONFIG_FILE: &str = "config.json";

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the selected interval (see [`Interval::name`])
    #[serde(deserialize_with = "lenient::or_default")]
    pub interval: String,
    /// Opaque identifier generated on first launch
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub user_id: Option<String>,
    /// Whether the notification permission explanation was already shown
    #[serde(deserialize_with = "lenient::or_default")]
    pub notification_prompt_shown: bool,
    /// Epoch seconds of the last update check (0 = never)
    #[serde(deserialize_with = "lenient::epoch_seconds")]
    pub last_update_check: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interval: Interval::default().name().to_string(),
            user_id: None,
            notification_prompt_shown: false,
            last_update_check: 0,
        }
    }
}

impl AppConfig {
    /// Returns the configured interval; unknown names resolve to the default.
    pub fn interval(&self) -> Interval {
        Interval::resolve(Some(&self.interval))
    }
}

// ============================================================================
// ConfigStore
// ============================================================================

/// In-memory configuration backed by the config document.
///
/// Every mutation is persisted immediately. The in-memory copy only changes
/// once the write has succeeded, so a failed save can simply be retried.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    store: JsonStore,
    config: AppConfig,
}

impl ConfigStore {
    /// Opens the configuration document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = JsonStore::new(path);
        let config = store.load();
        Self { store, config }
    }

    /// Opens `config.json` inside the data directory.
    pub fn open_in(dir: impl Into<PathBuf>) -> Self {
        Self::open(dir.into().join(CONFIG_FILE))
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the configured interval.
    pub fn interval(&self) -> Interval {
        self.config.interval()
    }

    /// Selects a new interval.
    pub fn set_interval(&mut self, interval: Interval) -> Result<()> {
        self.update(|config| config.interval = interval.name().to_string())?;
        tracing::info!(interval = %interval, "Interval saved");
        Ok(())
    }

    /// Records the time of an update check.
    pub fn mark_update_checked(&mut self, now: i64) -> Result<()> {
        self.update(|config| config.last_update_check = now)
    }

    /// Records that the notification permission explanation was shown.
    pub fn mark_notification_prompt_shown(&mut self) -> Result<()> {
        self.update(|config| config.notification_prompt_shown = true)
    }

    /// Returns the user id, generating and persisting one on first use.
    pub fn ensure_user_id(&mut self) -> Result<String> {
        if let Some(id) = &self.config.user_id {
            return Ok(id.clone());
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.update(|config| config.user_id = Some(id.clone()))?;
        Ok(id)
    }

    fn update(&mut self, mutate: impl FnOnce(&mut AppConfig)) -> Result<()> {
        let mut next = self.config.clone();
        mutate(&mut next);
        self.store.save(&next)?;
        self.config = next;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
