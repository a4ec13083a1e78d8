//! In-process backend - used when no hosted backend is configured.
//!
//! Rows and accounts live in memory and are lost on process restart.
//! Passwords are hashed with Argon2 and sessions carry signed tokens, so the
//! session lifecycle (expiry included) behaves like the hosted one.

mod backend;


pub use backend::{InMemoryBackend, InMemoryConfig};
