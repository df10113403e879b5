//! Host OAuth session abstraction
//!
//! The host platform manages the OAuth2 config entry: it stores the
//! refresh token, performs the refresh round-trip, and runs the reauth
//! flow when asked. This trait is the narrow waist the credential
//! provider talks through.

use async_trait::async_trait;
use thiserror::Error;

/// Lifecycle state of the config entry owning this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// The entry is still being set up; failures here decide between
    /// "needs reconfiguration" and "retry later".
    SetupInProgress,
    /// The entry is loaded and serving requests.
    Loaded,
}

/// Failures surfaced by the host session during token refresh.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The token endpoint answered with an error status.
    #[error("token endpoint rejected refresh (status {status})")]
    Response { status: u16 },

    /// The stored credentials could not be refreshed (revoked or
    /// malformed grant).
    #[error("credential refresh failed: {0}")]
    Refresh(String),

    /// The refresh request never completed.
    #[error("network error during token refresh: {0}")]
    Network(String),
}

impl SessionError {
    /// Status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Response { status } => Some(*status),
            _ => None,
        }
    }
}

/// Host-managed OAuth2 session for one config entry.
#[async_trait]
pub trait OAuthSession: Send + Sync {
    /// Refresh the access token if it is expired or about to expire.
    async fn ensure_token_valid(&self) -> std::result::Result<(), SessionError>;

    /// Current access token. Only meaningful after a successful
    /// `ensure_token_valid`.
    async fn access_token(&self) -> String;

    /// State of the owning config entry.
    fn entry_state(&self) -> EntryState;

    /// Ask the host to start a reauthentication flow for this entry.
    fn start_reauth(&self);
}
