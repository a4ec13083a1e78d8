//! # Blog Client
//!
//! Loads one page of the blog and prints it: the listing by default, or a
//! single post when `BLOG_POST_ID` is set.

use std::sync::Arc;

use anyhow::Context;
use blog_core::domain::Credentials;
use blog_core::pages::{HomePage, NavBar, PostDetailPage};
use blog_core::params::RouteParams;
use blog_core::store::AuthListener;

mod config;
mod render;
mod state;
mod telemetry;

use config::{AppConfig, StartupAuth};
use state::AppState;
use telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        backend = ?config.backend,
        page = config.page,
        per_page = config.store.posts_per_page,
        "Starting blog client"
    );

    let state = AppState::new(&config).context("building application state")?;
    let listener = AuthListener::start(state.store.clone()).await;

    if let Some(auth) = &config.auth {
        authenticate(&state, auth).await;
    }

    let nav = NavBar::new(state.store.clone());
    let output = match &config.post_id {
        Some(id) => show_post(&state, id).await,
        None => show_home(&state, config.page).await,
    };
    println!("{}", render::nav(&nav.links()));
    println!("{output}");

    listener.shutdown().await;
    Ok(())
}

async fn authenticate(state: &AppState, auth: &StartupAuth) {
    let credentials = Credentials::new(auth.email.clone(), auth.password.clone());
    let result = if auth.sign_up {
        state.store.sign_up(&credentials).await.map(|_| ())
    } else {
        state.store.sign_in(&credentials).await.map(|_| ())
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "Continuing signed out");
    }
}

async fn show_home(state: &AppState, page: u32) -> String {
    let home = HomePage::new(state.store.clone());
    if let Err(e) = home.go_to(page).await {
        tracing::error!(error = %e, "Could not load posts");
    }
    render::home(&home.view())
}

async fn show_post(state: &AppState, id: &str) -> String {
    let mut detail = PostDetailPage::new(Arc::clone(&state.store));
    detail.open(RouteParams::new().with_param("id", id)).await;
    render::detail(&detail)
}
