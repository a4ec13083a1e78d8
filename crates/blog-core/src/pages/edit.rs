use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{Post, PostId, PostPatch};
use crate::store::Store;

use super::{Navigation, POST_NOT_FOUND};

pub const NO_PERMISSION: &str = "You do not have permission to edit this post";

/// Owner-only edit form, prefilled from the stored post.
pub struct EditPostPage {
    store: Arc<Store>,
    post: Option<Post>,
    pub title: String,
    pub content: String,
    error: Option<String>,
    loading: bool,
    updating: bool,
    unmount: CancellationToken,
}

impl EditPostPage {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            post: None,
            title: String::new(),
            content: String::new(),
            error: None,
            loading: true,
            updating: false,
            unmount: CancellationToken::new(),
        }
    }

    pub fn unmount_token(&self) -> CancellationToken {
        self.unmount.clone()
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Load the post to edit. Returns a redirect when the user may not edit it.
    pub async fn open(&mut self, post_id: Option<&str>) -> Option<Navigation> {
        let Some(post_id) = post_id.filter(|id| !id.is_empty()) else {
            self.error = Some("Post ID is required".to_string());
            self.loading = false;
            return None;
        };
        let Some(user) = self.store.auth_state().user else {
            return Some(Navigation::SignIn);
        };

        let id = PostId::new(post_id);
        let backend = self.store.posts_backend().clone();
        let result = tokio::select! {
            biased;
            _ = self.unmount.cancelled() => {
                tracing::debug!(post_id = %id, "Page unmounted, dropping post load");
                return None;
            }
            result = backend.find(&id) => result,
        };
        self.loading = false;

        let post = match result {
            Ok(Some(post)) => post,
            Ok(None) => {
                self.error = Some(POST_NOT_FOUND.to_string());
                return None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        if !post.is_owned_by(&user) {
            tracing::warn!(post_id = %post.id, user_id = %user.id, "Edit attempted by non-owner");
            self.error = Some(NO_PERMISSION.to_string());
            return Some(Navigation::Home);
        }

        self.title = post.title.clone();
        self.content = post.content.clone();
        self.post = Some(post);
        self.error = None;
        None
    }

    /// Save the edited fields, trimmed. Returns where to go on success.
    pub async fn submit(&mut self) -> Option<Navigation> {
        self.error = None;

        if let Err(e) = PostPatch::new(self.title.as_str(), self.content.as_str()) {
            self.error = Some(e.to_string());
            return None;
        }
        let Some(id) = self.post.as_ref().map(|p| p.id.clone()) else {
            self.error = Some(POST_NOT_FOUND.to_string());
            return None;
        };

        self.updating = true;
        let result = self
            .store
            .update_post(&id, self.title.trim(), self.content.trim())
            .await;
        self.updating = false;

        match result {
            Ok(post) => {
                self.post = Some(post);
                Some(Navigation::Post(id))
            }
            Err(e) => {
                tracing::error!(post_id = %id, error = %e, "Update post failed");
                self.error = Some(e.message().to_string());
                None
            }
        }
    }
}
