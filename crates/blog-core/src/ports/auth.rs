//! Authentication port.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{AuthEvent, Credentials, Session, SignUpOutcome};
use crate::error::BackendError;

/// Session-based auth service.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError>;

    /// Sign in with e-mail and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Current session, if any.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Subscribe to session changes. Dropping the subscription unregisters it.
    fn subscribe(&self) -> AuthSubscription;
}

/// Stream of session changes from an [`AuthBackend`].
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    pub fn new(receiver: broadcast::Receiver<AuthEvent>) -> Self {
        Self { receiver }
    }

    /// Next session change, or `None` once the backend is gone.
    ///
    /// A lagging subscriber skips to the newest buffered events, since only the
    /// latest session matters.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::warn!(lagged = count, "Auth subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
