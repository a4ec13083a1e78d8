//! # Blog Shared
//!
//! Wire types exchanged with the hosted backend: PostgREST rows for the
//! `posts` table, GoTrue auth payloads, and the error bodies both services
//! return.

pub mod dto;
pub mod response;

pub use response::{AuthErrorBody, RestErrorBody};
