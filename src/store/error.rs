//! Error types for the JSON document store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Persistence error type.
///
/// Reads never produce these: a missing or malformed document falls back to
/// its default. Only writes fail, and the failure is handed to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Home directory not found.
    #[error("Failed to get home directory")]
    HomeDirectoryNotFound,

    /// Failed to create the data directory.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a document.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to serialize a document.
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The record did not serialize to a JSON object.
    #[error("Document for {0} is not a JSON object")]
    NotAnObject(PathBuf),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
