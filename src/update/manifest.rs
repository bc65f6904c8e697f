//! Remote version manifest.

use serde::{Deserialize, Serialize};

use super::error::{Result, UpdateError};
use super::version::Version;

/// Describes the latest published release.
///
/// ```json
/// {"version": "2.2.0", "download_url": "https://.../Standup.zip", "notes": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub download_url: String,
    #[serde(default)]
    pub notes: String,
}

impl Manifest {
    /// Parses a manifest body.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| UpdateError::InvalidManifest(e.to_string()))
    }

    /// Parsed release version.
    pub fn version(&self) -> Result<Version> {
        self.version.parse()
    }
}
