use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;
use crate::error::DomainError;

/// Message shown when a post form is submitted with a blank field.
pub const FIELDS_REQUIRED: &str = "Title and content are required";

/// Opaque post identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Post entity - one row of the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Content cut to at most `max_chars` characters, with `...` appended when cut.
    pub fn excerpt(&self, max_chars: usize) -> Cow<'_, str> {
        match self.content.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => Cow::Owned(format!("{}...", &self.content[..byte_idx])),
            None => Cow::Borrowed(&self.content),
        }
    }

    /// Creation date as shown in listings, e.g. `Mar 04, 2025`.
    pub fn posted_on(&self) -> String {
        self.created_at.format("%b %d, %Y").to_string()
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

fn require_fields(title: &str, content: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(DomainError::Validation(FIELDS_REQUIRED.to_string()));
    }
    Ok(())
}

/// Insert payload. The backend assigns id, owner and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    /// Build an insert payload, rejecting a blank title or content.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let (title, content) = (title.into(), content.into());
        require_fields(&title, &content)?;
        Ok(Self { title, content })
    }
}

/// Update payload. The backend stamps a fresh `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPatch {
    pub title: String,
    pub content: String,
}

impl PostPatch {
    /// Build an update payload, rejecting a blank title or content.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let (title, content) = (title.into(), content.into());
        require_fields(&title, &content)?;
        Ok(Self { title, content })
    }
}
