//! Local credential and session primitives for the in-memory backend.

mod jwt;
mod password;

pub use jwt::{JwtConfig, SessionTokenClaims, SessionTokens};
pub use password::Argon2PasswordHasher;
