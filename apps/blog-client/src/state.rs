//! Application state - the store wired to a concrete backend.

use std::sync::Arc;

use blog_core::Store;
use blog_infra::memory::{InMemoryBackend, InMemoryConfig};

#[cfg(feature = "supabase")]
use blog_infra::supabase::{SupabaseClient, SupabaseConfig};

use crate::config::{AppConfig, BackendKind};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    /// Build the store over the configured backend, falling back to memory.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store = match config.backend {
            BackendKind::Memory => {
                tracing::info!("Using in-memory backend");
                in_memory(config)
            }
            BackendKind::Supabase => hosted(config)?,
        };

        tracing::info!("Application state initialized");
        Ok(Self {
            store: Arc::new(store),
        })
    }
}

fn in_memory(config: &AppConfig) -> Store {
    let backend = Arc::new(InMemoryBackend::new(InMemoryConfig::from_env()));
    Store::new(backend.clone(), backend, config.store.clone())
}

#[cfg(feature = "supabase")]
fn hosted(config: &AppConfig) -> anyhow::Result<Store> {
    let Some(supabase) = SupabaseConfig::from_env() else {
        tracing::warn!("SUPABASE_URL not set. Running with in-memory backend.");
        return Ok(in_memory(config));
    };

    let client = Arc::new(SupabaseClient::new(supabase)?);
    Ok(Store::new(client.clone(), client, config.store.clone()))
}

#[cfg(not(feature = "supabase"))]
fn hosted(config: &AppConfig) -> anyhow::Result<Store> {
    tracing::warn!("Built without supabase feature - using in-memory backend");
    Ok(in_memory(config))
}
