//! Error types for Google Drive provider

use agent_traits::http::HttpError;
use agent_traits::AgentError;
use thiserror::Error;

/// Google Drive provider errors
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// API request returned an error status
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Resumable upload finished without returning a file id
    #[error("Upload of '{name}' completed without a file id")]
    MissingFileId { name: String },

    /// Resumable upload session could not be opened
    #[error("Upload session for '{name}' returned no session URI")]
    MissingSessionUri { name: String },

    /// Content stream length did not match the declared size
    #[error("Upload of '{name}' sent {sent} bytes, expected {expected}")]
    SizeMismatch {
        name: String,
        sent: u64,
        expected: u64,
    },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl From<HttpError> for GoogleDriveError {
    fn from(error: HttpError) -> Self {
        GoogleDriveError::NetworkError(error.to_string())
    }
}

impl From<GoogleDriveError> for AgentError {
    fn from(error: GoogleDriveError) -> Self {
        AgentError::Storage(error.to_string())
    }
}
