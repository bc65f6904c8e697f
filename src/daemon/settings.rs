//! Runtime settings for the reminder loop.
//!
//! Unlike [`AppConfig`](crate::store::AppConfig) these are not persisted.
//! They come from defaults, the environment, and CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::store::{self, data_dir};

/// Environment variable overriding the manifest URL.
pub const MANIFEST_URL_ENV: &str = "STANDUP_MANIFEST_URL";

/// Where releases are published.
pub const DEFAULT_MANIFEST_URL: &str = "https://standup-reminder.app/updates/latest.json";

/// Default HTTP timeout for update requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Default limit for downloading a whole update archive.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Settings for one run of the reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Directory holding `config.json` and `stats.json`
    pub data_dir: PathBuf,
    /// Update manifest location
    pub manifest_url: String,
    /// Timeout for each update request, and for connecting during a download
    pub http_timeout: Duration,
    /// Limit for an entire archive download
    pub download_timeout: Duration,
    /// Countdown tick period
    pub tick_period: Duration,
    /// Where update archives are staged
    pub scratch_dir: PathBuf,
}

impl RunSettings {
    /// Builds settings for `data_dir` with every other value defaulted.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            scratch_dir: data_dir.join("updates"),
            data_dir,
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            tick_period: Duration::from_secs(1),
        }
    }

    /// Builds settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined.
    pub fn from_env() -> store::Result<Self> {
        let mut settings = Self::new(data_dir()?);
        if let Some(url) = std::env::var(MANIFEST_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            settings.manifest_url = url;
        }
        Ok(settings)
    }

    /// Applies a manifest URL given on the command line.
    pub fn with_manifest_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.manifest_url = url;
        }
        self
    }
}
