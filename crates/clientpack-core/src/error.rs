//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The persisted version cannot be bumped.
    #[error("invalid version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Failed to hash a file.
    #[error("failed to hash {path}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk an include directory.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Failed to serialize or parse a manifest.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Failed to write the archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
