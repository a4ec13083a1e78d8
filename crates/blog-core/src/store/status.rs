//! Request lifecycle tracking.

use std::fmt;

use thiserror::Error;

use crate::error::{BackendError, DomainError};

/// Lifecycle of one kind of async request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

/// Async operations published by the containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchPosts,
    CreatePost,
    UpdatePost,
    DeletePost,
    SignUp,
    SignIn,
    SignOut,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchPosts => "blog/fetchPosts",
            Operation::CreatePost => "blog/createPost",
            Operation::UpdatePost => "blog/updatePost",
            Operation::DeletePost => "blog/deletePost",
            Operation::SignUp => "auth/signUp",
            Operation::SignIn => "auth/signIn",
            Operation::SignOut => "auth/signOut",
        }
    }

    /// The single message stored in a container when this operation is rejected.
    ///
    /// Post operations wrap the backend's message; auth operations surface the
    /// auth service's own message, or a fixed fallback for any other failure.
    pub fn failure_message(&self, err: &BackendError) -> String {
        match self {
            Operation::FetchPosts => format!("Failed to fetch posts: {err}"),
            Operation::CreatePost => format!("Failed to create post: {err}"),
            Operation::UpdatePost => format!("Update failed: {err}"),
            Operation::DeletePost => format!("Delete failed: {err}"),
            Operation::SignUp => auth_failure(err, "Signup failed"),
            Operation::SignIn => auth_failure(err, "Login failed"),
            Operation::SignOut => auth_failure(err, "Logout failed"),
        }
    }
}

fn auth_failure(err: &BackendError, fallback: &str) -> String {
    err.auth_message().unwrap_or(fallback).to_string()
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection returned to the caller of a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Input was refused before any remote call. No state changed.
    #[error("{message}")]
    Validation {
        operation: Operation,
        message: String,
    },

    /// The backend refused or failed the call. `message` is also in the container.
    #[error("{message}")]
    Rejected {
        operation: Operation,
        message: String,
    },
}

impl RequestError {
    pub(crate) fn validation(operation: Operation, err: DomainError) -> Self {
        RequestError::Validation {
            operation,
            message: err.to_string(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            RequestError::Validation { operation, .. } | RequestError::Rejected { operation, .. } => {
                *operation
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RequestError::Validation { message, .. } | RequestError::Rejected { message, .. } => {
                message
            }
        }
    }
}
