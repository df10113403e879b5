use thiserror::Error;

/// Host-facing failure taxonomy for backup agent operations.
///
/// Every remote failure is wrapped into one of these variants before it
/// reaches the host; the messages are meant to be shown to a user.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Credentials are invalid or expired and cannot be refreshed
    /// without user re-consent. The host should reconfigure the entry.
    #[error("Authentication failed, reauthorization required: {0}")]
    Unauthorized(String),

    /// Transient network or service failure. The caller is expected to
    /// retry the operation later.
    #[error("Service unavailable, retry later: {0}")]
    Unavailable(String),

    /// The requested backup id has no manifest record, or its content
    /// file is missing from remote storage.
    #[error("Backup not found: {backup_id}")]
    BackupNotFound { backup_id: String },

    /// Upload produced no file id, a decode failed, or the storage API
    /// returned an unexpected shape.
    #[error("Storage operation failed: {0}")]
    Storage(String),
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AgentError::BackupNotFound {
            backup_id: "abc123".to_string(),
        };
        assert_eq!(error.to_string(), "Backup not found: abc123");

        let error = AgentError::Storage("no file id returned".to_string());
        assert!(error.to_string().contains("no file id returned"));
    }
}
