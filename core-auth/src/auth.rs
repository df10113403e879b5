//! Credential provider tied to an OAuth2 config entry.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{AuthError, Result};
use crate::session::{EntryState, OAuthSession, SessionError};

/// Provides Drive authentication tied to a host OAuth2 session.
///
/// Each storage operation asks this provider for a fresh valid token;
/// the provider delegates refresh to the host session and translates
/// its failures into the setup/runtime policy:
///
/// - during setup a 4xx rejection means "reauth required" and anything
///   else means "retry later";
/// - once running, a credential rejection additionally triggers the
///   host's reauth flow before the error is surfaced.
#[derive(Clone)]
pub struct ConfigEntryAuth {
    session: Arc<dyn OAuthSession>,
}

impl ConfigEntryAuth {
    pub fn new(session: Arc<dyn OAuthSession>) -> Self {
        Self { session }
    }

    /// Ensure the session token is valid and return it.
    #[instrument(skip(self))]
    pub async fn check_and_refresh_token(&self) -> Result<String> {
        if let Err(err) = self.session.ensure_token_valid().await {
            return Err(self.classify_refresh_failure(err));
        }
        debug!("Token is valid");
        Ok(self.session.access_token().await)
    }

    fn classify_refresh_failure(&self, err: SessionError) -> AuthError {
        if self.session.entry_state() == EntryState::SetupInProgress {
            return match err.status() {
                Some(status) if (400..500).contains(&status) => {
                    warn!(status, "Token refresh rejected during setup");
                    AuthError::ReauthRequired
                }
                _ => AuthError::NotReady(err.to_string()),
            };
        }

        // Already running: a refresh rejection or a 400 from the token
        // endpoint means the grant is gone, so ask the host to
        // reauthenticate before surfacing. Other statuses (401, 403,
        // 5xx) can be transient token-endpoint trouble and do not
        // invalidate the entry.
        let credentials_rejected =
            matches!(err, SessionError::Refresh(_)) || err.status() == Some(400);
        if credentials_rejected {
            warn!("Credentials rejected at runtime, requesting reauth");
            self.session.start_reauth();
        }
        AuthError::TokenRefreshFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeSession {
        refresh_result: Option<SessionError>,
        state: EntryState,
        reauth_started: AtomicBool,
    }

    impl FakeSession {
        fn new(refresh_result: Option<SessionError>, state: EntryState) -> Self {
            Self {
                refresh_result,
                state,
                reauth_started: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl OAuthSession for FakeSession {
        async fn ensure_token_valid(&self) -> std::result::Result<(), SessionError> {
            match &self.refresh_result {
                None => Ok(()),
                Some(SessionError::Response { status }) => {
                    Err(SessionError::Response { status: *status })
                }
                Some(SessionError::Refresh(msg)) => Err(SessionError::Refresh(msg.clone())),
                Some(SessionError::Network(msg)) => Err(SessionError::Network(msg.clone())),
            }
        }

        async fn access_token(&self) -> String {
            "valid_token".to_string()
        }

        fn entry_state(&self) -> EntryState {
            self.state
        }

        fn start_reauth(&self) {
            self.reauth_started.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_valid_token_passthrough() {
        let session = Arc::new(FakeSession::new(None, EntryState::Loaded));
        let auth = ConfigEntryAuth::new(session);

        let token = auth.check_and_refresh_token().await.unwrap();
        assert_eq!(token, "valid_token");
    }

    #[tokio::test]
    async fn test_setup_4xx_requires_reauth() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Response { status: 401 }),
            EntryState::SetupInProgress,
        ));
        let auth = ConfigEntryAuth::new(session.clone());

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::ReauthRequired));
        // Setup failures never trigger the runtime reauth flow.
        assert!(!session.reauth_started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_setup_transient_failure_is_not_ready() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Network("connection reset".to_string())),
            EntryState::SetupInProgress,
        ));
        let auth = ConfigEntryAuth::new(session.clone());

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::NotReady(_)));
        assert!(!session.reauth_started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_setup_5xx_is_not_ready() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Response { status: 503 }),
            EntryState::SetupInProgress,
        ));
        let auth = ConfigEntryAuth::new(session);

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::NotReady(_)));
    }

    #[tokio::test]
    async fn test_runtime_rejection_starts_reauth() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Refresh("grant revoked".to_string())),
            EntryState::Loaded,
        ));
        let auth = ConfigEntryAuth::new(session.clone());

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRefreshFailed(_)));
        assert!(session.reauth_started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_runtime_400_starts_reauth() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Response { status: 400 }),
            EntryState::Loaded,
        ));
        let auth = ConfigEntryAuth::new(session.clone());

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRefreshFailed(_)));
        assert!(session.reauth_started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_runtime_401_does_not_reauth() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Response { status: 401 }),
            EntryState::Loaded,
        ));
        let auth = ConfigEntryAuth::new(session.clone());

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRefreshFailed(_)));
        // Only a 400 marks the grant itself as gone.
        assert!(!session.reauth_started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_runtime_network_failure_does_not_reauth() {
        let session = Arc::new(FakeSession::new(
            Some(SessionError::Network("timeout".to_string())),
            EntryState::Loaded,
        ));
        let auth = ConfigEntryAuth::new(session.clone());

        let err = auth.check_and_refresh_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRefreshFailed(_)));
        assert!(!session.reauth_started.load(Ordering::SeqCst));
    }
}
