//! Application configuration loaded from environment variables.

use std::env;

use blog_core::StoreConfig;
use blog_core::store::MutationPolicy;

/// Which backend the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Supabase,
}

/// Credentials to authenticate with before loading.
#[derive(Clone)]
pub struct StartupAuth {
    pub email: String,
    pub password: String,
    /// Register instead of signing in.
    pub sign_up: bool,
}

impl std::fmt::Debug for StartupAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupAuth")
            .field("email", &blog_core::domain::mask_email(&self.email))
            .field("sign_up", &self.sign_up)
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub store: StoreConfig,
    pub page: u32,
    pub post_id: Option<String>,
    pub auth: Option<StartupAuth>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let backend = match env::var("BLOG_BACKEND").ok().as_deref() {
            Some("memory") => BackendKind::Memory,
            Some("supabase") => BackendKind::Supabase,
            Some(other) => {
                tracing::warn!(value = other, "Unknown BLOG_BACKEND, using supabase");
                BackendKind::Supabase
            }
            None => BackendKind::Supabase,
        };

        let defaults = StoreConfig::default();
        let store = StoreConfig {
            posts_per_page: positive(env::var("POSTS_PER_PAGE").ok())
                .unwrap_or(defaults.posts_per_page),
            mutation_policy: env::var("BLOG_MUTATION_POLICY")
                .ok()
                .and_then(|s| MutationPolicy::parse(&s))
                .unwrap_or(defaults.mutation_policy),
        };

        let auth = match (env::var("BLOG_EMAIL"), env::var("BLOG_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(StartupAuth {
                email,
                password,
                sign_up: env::var("BLOG_SIGN_UP")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            }),
            _ => None,
        };

        Self {
            backend,
            store,
            page: positive(env::var("BLOG_PAGE").ok()).unwrap_or(1),
            post_id: env::var("BLOG_POST_ID").ok().filter(|v| !v.is_empty()),
            auth,
        }
    }
}

/// A 1-based count; zero and garbage fall back to the default.
fn positive(value: Option<String>) -> Option<u32> {
    value.and_then(|s| s.trim().parse().ok()).filter(|n| *n > 0)
}
