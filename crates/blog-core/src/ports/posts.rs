use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostId, PostPage, PostPatch, RowRange};
use crate::error::BackendError;

/// Row access to the `posts` table.
#[async_trait]
pub trait PostBackend: Send + Sync {
    /// Select the rows in `range`, newest `created_at` first, with an exact total count.
    async fn list(&self, range: RowRange) -> Result<PostPage, BackendError>;

    /// Select a single row by id.
    async fn find(&self, id: &PostId) -> Result<Option<Post>, BackendError>;

    /// Insert one row and return it as stored.
    async fn insert(&self, post: NewPost) -> Result<Post, BackendError>;

    /// Update the row matching `id`, stamping a new `updated_at`.
    /// Fails with [`BackendError::NotFound`] when no row matched.
    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post, BackendError>;

    /// Delete the rows matching `id`. Returns how many were removed.
    async fn delete(&self, id: &PostId) -> Result<u64, BackendError>;
}
