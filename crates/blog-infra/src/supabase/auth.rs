use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode};

use blog_core::BackendError;
use blog_core::domain::{AuthEvent, Credentials, Session, SignUpOutcome, mask_email};
use blog_core::ports::{AuthBackend, AuthSubscription};
use blog_shared::dto::{AuthSession, PasswordCredentials, RefreshTokenRequest, SignUpResponse};

use super::client::{SupabaseClient, auth_json, session_from, transport_error, user_from};

impl SupabaseClient {
    async fn store_session(&self, session: Session, event: AuthEvent) {
        *self.session.write().await = Some(session);
        self.emit(event);
    }

    async fn clear_session(&self) {
        if self.session.write().await.take().is_some() {
            self.emit(AuthEvent::signed_out());
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let response = self
            .auth(Method::POST, "token?grant_type=refresh_token")
            .json(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(transport_error)?;

        let body: AuthSession = auth_json(response).await?;
        Ok(session_from(body, Utc::now()))
    }
}

fn password_body(credentials: &Credentials) -> PasswordCredentials {
    PasswordCredentials {
        email: credentials.email.clone(),
        password: credentials.password.clone(),
    }
}

#[async_trait]
impl AuthBackend for SupabaseClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .auth(Method::POST, "signup")
            .json(&password_body(credentials))
            .send()
            .await
            .map_err(transport_error)?;

        match auth_json::<SignUpResponse>(response).await? {
            SignUpResponse::Session(body) => {
                let session = session_from(body, Utc::now());
                self.store_session(session.clone(), AuthEvent::signed_in(session.clone()))
                    .await;
                Ok(SignUpOutcome {
                    user: Some(session.user.clone()),
                    session: Some(session),
                })
            }
            SignUpResponse::User(user) => {
                tracing::info!(
                    email = %mask_email(&credentials.email),
                    "Sign up awaiting e-mail confirmation"
                );
                Ok(SignUpOutcome {
                    user: Some(user_from(user)),
                    session: None,
                })
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let response = self
            .auth(Method::POST, "token?grant_type=password")
            .json(&password_body(credentials))
            .send()
            .await
            .map_err(transport_error)?;

        let body: AuthSession = auth_json(response).await?;
        let session = session_from(body, Utc::now());
        self.store_session(session.clone(), AuthEvent::signed_in(session.clone()))
            .await;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let token = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => return Ok(()),
        };

        let response = self
            .auth(Method::POST, "logout")
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        // A token the service no longer knows is already signed out.
        let gone = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND);
        if !status.is_success() && !gone {
            auth_json::<serde_json::Value>(response).await?;
        }

        self.clear_session().await;
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(session) = self.session.read().await.clone() else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now()) {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.clear_session().await;
            return Ok(None);
        };

        match self.refresh(refresh_token).await {
            Ok(renewed) => {
                tracing::debug!(user_id = %renewed.user.id, "Session refreshed");
                self.store_session(renewed.clone(), AuthEvent::token_refreshed(renewed.clone()))
                    .await;
                Ok(Some(renewed))
            }
            Err(BackendError::Auth(message)) => {
                tracing::info!(%message, "Refresh token rejected");
                self.clear_session().await;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.changes.subscribe())
    }
}
