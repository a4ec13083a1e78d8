//! Keeps the auth container in step with the auth service's session.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::Store;

/// Background task forwarding session changes to [`Store::set_user`].
///
/// Dropping the listener cancels it; [`AuthListener::shutdown`] also waits for
/// the task to finish.
pub struct AuthListener {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AuthListener {
    /// Subscribe to session changes, then seed the store from the current session.
    pub async fn start(store: Arc<Store>) -> Self {
        // Subscribe before the initial check so no change slips between the two.
        let mut subscription = store.auth_backend().subscribe();

        match store.auth_backend().get_session().await {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user.id, "Restored existing session");
                store.set_user(Some(session.user));
            }
            Ok(None) => tracing::debug!("No existing session"),
            Err(e) => tracing::warn!(error = %e, "Initial session check failed"),
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    event = subscription.next() => match event {
                        Some(event) => {
                            tracing::info!(kind = ?event.kind, "Session changed");
                            store.set_user(event.session.map(|s| s.user));
                        }
                        None => {
                            tracing::info!("Auth service closed session stream");
                            break;
                        }
                    },
                }
            }
        });

        Self {
            token,
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Unsubscribe and wait for the forwarding task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Auth listener task failed");
            }
        }
    }
}

impl Drop for AuthListener {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
