//! Signed access tokens for locally issued sessions.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::BackendError;
use blog_core::domain::User;

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Session token configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime. Negative values issue already-expired tokens.
    pub ttl_secs: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            ttl_secs: 3600,
            issuer: "blog-client".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        if secret == DEFAULT_SECRET {
            tracing::warn!(
                "Using default session secret. Set SESSION_JWT_SECRET to sign local sessions."
            );
        }

        Self {
            secret,
            ttl_secs: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "blog-client".to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    email: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// What a valid access token says about its holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks HS256 session tokens.
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl SessionTokens {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Sign a token for `user`, returning it with its expiry.
    pub fn issue(&self, user: &User) -> Result<(String, DateTime<Utc>), BackendError> {
        let now = Utc::now();
        let expires_at = now + TimeDelta::seconds(self.config.ttl_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| BackendError::Internal(format!("Token signing failed: {e}")))?;
        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> Result<SessionTokenClaims, BackendError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    BackendError::Auth("Session expired".to_string())
                }
                _ => BackendError::Auth(format!("Invalid session token: {e}")),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| BackendError::Auth(format!("Invalid session token: {e}")))?;
        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| BackendError::Auth("Invalid session token: bad expiry".to_string()))?;

        Ok(SessionTokenClaims {
            user_id,
            email: data.claims.email,
            expires_at,
        })
    }
}
