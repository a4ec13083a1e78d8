//! Hosted backend speaking PostgREST for rows and GoTrue for sessions.

mod auth;
mod client;
mod config;
mod posts;


pub use client::SupabaseClient;
pub use config::SupabaseConfig;
