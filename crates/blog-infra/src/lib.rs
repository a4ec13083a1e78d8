//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - In-memory backend only
//! - `supabase` - Hosted PostgREST + GoTrue backend via reqwest

pub mod auth;
pub mod memory;

#[cfg(feature = "supabase")]
pub mod supabase;

// Re-exports - In-Memory
pub use auth::{Argon2PasswordHasher, JwtConfig, SessionTokens};
pub use memory::{InMemoryBackend, InMemoryConfig};

// Re-exports - Hosted
#[cfg(feature = "supabase")]
pub use supabase::{SupabaseClient, SupabaseConfig};
