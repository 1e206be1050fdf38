//! Publisher error types.

use thiserror::Error;

/// Release publishing errors.
#[derive(Debug, Error)]
pub enum PublishError {
    /// No token in the environment.
    #[error("no {var} found in environment variables")]
    MissingToken { var: String },

    /// Repository is not in `owner/name` form.
    #[error("invalid repository {0:?}, expected owner/name")]
    InvalidRepository(String),

    /// The release-creation request was rejected.
    #[error("release creation failed: {status} {body}")]
    ReleaseRejected { status: u16, body: String },

    /// The release was created but its response could not be decoded, so
    /// there is no upload URL to continue with.
    #[error("release created ({status}) but its response could not be read: {reason}")]
    ReleaseUnreadable { status: u16, reason: String },

    /// The asset upload was rejected.
    #[error("asset upload failed: {status} {body}")]
    UploadRejected { status: u16, body: String },

    /// Network or response decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;
