use agent_traits::AgentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Credentials were rejected; the user must re-consent.
    #[error("OAuth session is not valid, reauth required")]
    ReauthRequired,

    /// Transient failure during entry setup; the host should retry.
    #[error("Authentication not ready: {0}")]
    NotReady(String),

    /// Refresh failed while the entry was already running.
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl From<AuthError> for AgentError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::ReauthRequired => AgentError::Unauthorized(error.to_string()),
            AuthError::NotReady(msg) => AgentError::Unavailable(msg),
            AuthError::TokenRefreshFailed(msg) => AgentError::Unauthorized(msg),
        }
    }
}
