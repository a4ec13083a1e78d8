use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{Post, PostId};
use crate::params::{ParamValidator, RouteParams};
use crate::store::Store;

use super::{Navigation, POST_NOT_FOUND};

const DELETE_FAILED: &str = "Failed to delete post";

/// Single post view with owner-only delete.
pub struct PostDetailPage {
    store: Arc<Store>,
    params: ParamValidator,
    post: Option<Post>,
    loading: bool,
    error: Option<String>,
    confirming_delete: bool,
    unmount: CancellationToken,
}

impl PostDetailPage {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            params: ParamValidator::new(["id"]),
            post: None,
            loading: true,
            error: None,
            confirming_delete: false,
            unmount: CancellationToken::new(),
        }
    }

    /// Token the router cancels when the page goes away.
    pub fn unmount_token(&self) -> CancellationToken {
        self.unmount.clone()
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    /// Take the route parameters; reloads only when the validated id changed.
    pub async fn open(&mut self, route: RouteParams) {
        if self.params.sync(route) {
            self.load().await;
        }
    }

    /// Re-validate the last route parameters and reload.
    pub async fn refresh(&mut self) {
        self.params.force_refresh();
        self.load().await;
    }

    /// The signed-in user owns the shown post.
    pub fn can_manage(&self) -> bool {
        let auth = self.store.auth_state();
        match (&self.post, &auth.user) {
            (Some(post), Some(user)) => post.is_owned_by(user),
            _ => false,
        }
    }

    pub fn request_delete(&mut self) {
        if self.can_manage() {
            self.confirming_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Second step of delete. Returns where to go on success.
    pub async fn confirm_delete(&mut self) -> Option<Navigation> {
        let id = PostId::new(self.params.current().get("id")?);
        if !self.confirming_delete {
            return None;
        }

        match self.store.delete_post(&id).await {
            Ok(_) => Some(Navigation::Home),
            Err(e) => {
                tracing::error!(post_id = %id, error = %e, "Delete post failed");
                self.error = Some(DELETE_FAILED.to_string());
                None
            }
        }
    }

    async fn load(&mut self) {
        let validated = self.params.current();
        let id = match (validated.get("id"), validated.error()) {
            (Some(id), _) => PostId::new(id),
            (None, Some(err)) => {
                self.error = Some(err.to_string());
                self.loading = false;
                return;
            }
            (None, None) => return,
        };

        let backend = self.store.posts_backend().clone();
        let result = tokio::select! {
            biased;
            _ = self.unmount.cancelled() => {
                tracing::debug!(post_id = %id, "Page unmounted, dropping post load");
                return;
            }
            result = backend.find(&id) => result,
        };

        match result {
            Ok(Some(post)) => {
                self.post = Some(post);
                self.error = None;
            }
            Ok(None) => self.error = Some(POST_NOT_FOUND.to_string()),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }
}
