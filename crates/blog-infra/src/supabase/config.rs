use std::time::Duration;

/// Connection settings for the hosted project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL without a trailing slash.
    pub url: String,
    pub anon_key: String,
    pub posts_table: String,
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            posts_table: "posts".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Returns `None` unless both `SUPABASE_URL` and `SUPABASE_ANON_KEY` are set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty());
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .ok()
            .filter(|v| !v.is_empty());

        let (url, anon_key) = match (url, anon_key) {
            (Some(url), Some(key)) => (url, key),
            (Some(_), None) => {
                tracing::warn!("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing");
                return None;
            }
            _ => return None,
        };

        let mut config = Self::new(url, anon_key);
        if let Ok(table) = std::env::var("SUPABASE_POSTS_TABLE") {
            config.posts_table = table;
        }
        if let Some(secs) = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Some(config)
    }
}
