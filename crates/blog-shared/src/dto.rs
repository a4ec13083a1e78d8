//! Data Transfer Objects - request/response bodies for the REST and auth APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A row of the `posts` table as PostgREST returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRow {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of an insert. Id, owner and timestamps come from column defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPostRow {
    pub title: String,
    pub content: String,
}

/// Body of an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRow {
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// Accept both `bigint` and `uuid`/`text` primary keys.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Request to sign up or sign in with a password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

/// Request to exchange a refresh token for a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// A user as the auth service reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Token response of the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Expiry as a unix timestamp.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Sign up answers with a session, or only the user when e-mail confirmation
/// is pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}
