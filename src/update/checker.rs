//! Manifest fetching and version comparison.

use std::time::Duration;

use reqwest::Client;

use super::error::{Result, UpdateError};
use super::manifest::Manifest;
use super::version::Version;

/// Result of comparing the running version with the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Running version is the latest (or newer).
    UpToDate { current: Version },
    /// The manifest advertises a newer version.
    Available {
        current: Version,
        latest: Version,
        manifest: Manifest,
    },
}

/// Fetches the manifest and compares it with the running version.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: Client,
    manifest_url: String,
    current: Version,
}

impl UpdateChecker {
    /// Creates a checker whose requests time out after `timeout`.
    pub fn new(manifest_url: impl Into<String>, current: Version, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("standup/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, manifest_url, current))
    }

    pub fn with_client(client: Client, manifest_url: impl Into<String>, current: Version) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
            current,
        }
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    pub fn current_version(&self) -> &Version {
        &self.current
    }

    /// Pretends to be another version (dev trigger).
    pub fn set_current_version(&mut self, version: Version) {
        tracing::info!(version = %version, "Overriding running version");
        self.current = version;
    }

    /// Downloads and parses the manifest.
    pub async fn fetch_manifest(&self) -> Result<Manifest> {
        tracing::debug!(url = %self.manifest_url, "Fetching update manifest");

        let response = self.client.get(&self.manifest_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::HttpStatus {
                url: self.manifest_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Manifest::parse(&body)
    }

    /// Fetches the manifest and compares versions.
    pub async fn check(&self) -> Result<UpdateStatus> {
        let manifest = self.fetch_manifest().await?;
        let latest = manifest.version()?;
        let current = self.current.clone();

        if latest > current {
            tracing::info!(current = %current, latest = %latest, "Update available");
            Ok(UpdateStatus::Available {
                current,
                latest,
                manifest,
            })
        } else {
            tracing::debug!(current = %current, latest = %latest, "Up to date");
            Ok(UpdateStatus::UpToDate { current })
        }
    }
}
