//! Ports - trait definitions for the managed backend.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod posts;

pub use auth::{AuthBackend, AuthSubscription};
pub use posts::PostBackend;
