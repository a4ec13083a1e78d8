//! # Blog Core
//!
//! The domain layer of the blog client.
//! This crate holds the post and session model, the ports a backend must
//! implement, and the state containers that mirror request lifecycles.
//! It has no knowledge of any concrete backend.

pub mod domain;
pub mod error;
pub mod pages;
pub mod params;
pub mod ports;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BackendError, DomainError};
pub use store::{Store, StoreConfig};
