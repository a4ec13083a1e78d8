use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::{RwLock, broadcast};

use blog_core::BackendError;
use blog_core::domain::{AuthEvent, Post, PostId, Session, User};
use blog_shared::dto::{AuthSession, AuthUser, PostRow};
use blog_shared::{AuthErrorBody, RestErrorBody};

use super::config::SupabaseConfig;

const EVENT_BUFFER: usize = 64;
const BODY_PREVIEW_CHARS: usize = 160;

/// Client for one hosted project. Holds the signed-in session locally.
pub struct SupabaseClient {
    pub(super) http: Client,
    pub(super) config: SupabaseConfig,
    pub(super) session: RwLock<Option<Session>>,
    pub(super) changes: broadcast::Sender<AuthEvent>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Connection(format!("HTTP client setup failed: {e}")))?;
        let (changes, _) = broadcast::channel(EVENT_BUFFER);

        tracing::info!(url = %config.url, table = %config.posts_table, "Hosted backend configured");
        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
            changes,
        })
    }

    pub(super) fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.posts_table)
    }

    pub(super) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.url)
    }

    /// REST request carrying the session token, or the anon key when signed out.
    pub(super) async fn rest(&self, method: Method) -> RequestBuilder {
        let token = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.config.anon_key.clone(),
        };
        self.http
            .request(method, self.rest_url())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
    }

    pub(super) fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.auth_url(path))
            .header("apikey", &self.config.anon_key)
    }

    pub(super) fn emit(&self, event: AuthEvent) {
        let _ = self.changes.send(event);
    }
}

pub(super) fn transport_error(error: reqwest::Error) -> BackendError {
    if error.is_decode() {
        BackendError::Decode(error.to_string())
    } else {
        BackendError::Connection(error.to_string())
    }
}

/// Body of a successful REST response, or the mapped error.
pub(super) async fn rest_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(rest_status_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Body of a successful auth response, or the mapped error.
pub(super) async fn auth_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(auth_status_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

pub(super) fn rest_status_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<RestErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| status_message(status, body));

    match status {
        StatusCode::UNAUTHORIZED => BackendError::Auth(message),
        StatusCode::CONFLICT => BackendError::Constraint(message),
        _ if status.is_server_error() => BackendError::Connection(message),
        _ => BackendError::Query(message),
    }
}

pub(super) fn auth_status_error(status: StatusCode, body: &str) -> BackendError {
    let parsed = serde_json::from_str::<AuthErrorBody>(body).unwrap_or_default();
    let message = parsed
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| status_message(status, body));

    if status.is_server_error() {
        BackendError::Connection(message)
    } else {
        BackendError::Auth(message)
    }
}

fn status_message(status: StatusCode, body: &str) -> String {
    let preview = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect::<String>();
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

/// Total from a `Content-Range` value such as `0-9/42` or `*/0`.
pub(super) fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.split_once('/')?;
    total.trim().parse().ok()
}

pub(super) fn post_from_row(row: PostRow) -> Post {
    Post {
        id: PostId::new(row.id),
        user_id: row.user_id,
        title: row.title,
        content: row.content,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub(super) fn user_from(user: AuthUser) -> User {
    User {
        id: user.id,
        email: user.email.unwrap_or_default(),
        created_at: user.created_at,
    }
}

pub(super) fn session_from(body: AuthSession, now: DateTime<Utc>) -> Session {
    let expires_at = body
        .expires_at
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .or_else(|| body.expires_in.map(|secs| now + TimeDelta::seconds(secs)));

    Session {
        access_token: body.access_token,
        refresh_token: body.refresh_token,
        expires_at,
        user: user_from(body.user),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn auth_user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: Some("ada@example.com".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(content_range_total("0-9/42"), Some(42));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-9/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn test_urls() {
        let client = SupabaseClient::new(SupabaseConfig::new("https://abc.supabase.co/", "k")).unwrap();
        assert_eq!(client.rest_url(), "https://abc.supabase.co/rest/v1/posts");
        assert_eq!(
            client.auth_url("token?grant_type=password"),
            "https://abc.supabase.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_rest_errors_by_status() {
        let body = r#"{"message":"JWT expired","code":"PGRST301"}"#;
        assert_eq!(
            rest_status_error(StatusCode::UNAUTHORIZED, body),
            BackendError::Auth("JWT expired".to_string())
        );
        assert_eq!(
            rest_status_error(StatusCode::CONFLICT, r#"{"message":"duplicate key"}"#),
            BackendError::Constraint("duplicate key".to_string())
        );
        assert_eq!(
            rest_status_error(StatusCode::BAD_GATEWAY, ""),
            BackendError::Connection("status 502".to_string())
        );
        assert_eq!(
            rest_status_error(StatusCode::BAD_REQUEST, "not json"),
            BackendError::Query("status 400: not json".to_string())
        );
    }

    #[test]
    fn test_auth_errors_carry_service_message() {
        let err = auth_status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.auth_message(), Some("Invalid login credentials"));

        let err = auth_status_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.auth_message(), None);
    }

    #[test]
    fn test_session_expiry_from_either_field() {
        let now = Utc::now();
        let absolute = AuthSession {
            access_token: "a".to_string(),
            token_type: None,
            expires_in: Some(3600),
            expires_at: Some(1_900_000_000),
            refresh_token: Some("r".to_string()),
            user: auth_user(),
        };
        assert_eq!(
            session_from(absolute, now).expires_at.map(|t| t.timestamp()),
            Some(1_900_000_000)
        );

        let relative = AuthSession {
            access_token: "a".to_string(),
            token_type: None,
            expires_in: Some(60),
            expires_at: None,
            refresh_token: None,
            user: auth_user(),
        };
        let session = session_from(relative, now);
        assert_eq!(session.expires_at, Some(now + TimeDelta::seconds(60)));
        assert_eq!(session.user.email, "ada@example.com");
    }
}
