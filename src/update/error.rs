//! Update error types.
//!
//! Every variant here is recoverable: the checker reports it to the user
//! and the reminder keeps running.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from checking for, downloading, or installing an update.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The request never completed (DNS, TLS, timeout, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The manifest body is not the expected JSON.
    #[error("Invalid update manifest: {0}")]
    InvalidManifest(String),

    /// A version string has a non-numeric component.
    #[error("Invalid version string: '{0}'")]
    InvalidVersion(String),

    /// Filesystem failure while staging or installing.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The downloaded archive could not be extracted.
    #[error("Failed to extract update archive: {0}")]
    Extraction(String),

    /// The archive did not contain an application bundle.
    #[error("No application bundle found in {0}")]
    BundleNotFound(PathBuf),

    /// The running binary is not inside an application bundle.
    #[error("Not running from an installed application bundle")]
    NotInstalled,

    /// The new version could not be started.
    #[error("Failed to relaunch: {0}")]
    Relaunch(String),
}

impl UpdateError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns true if the error came from talking to the server.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }

    /// Returns true if the downloaded archive was unusable.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::BundleNotFound(_))
    }
}

/// Result type for update operations.
pub type Result<T> = std::result::Result<T, UpdateError>;
