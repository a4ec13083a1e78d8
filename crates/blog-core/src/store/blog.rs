//! Post state container.

use crate::domain::{NewPost, PageRequest, Post, PostId, PostPage, PostPatch};

use super::status::{Operation, RequestError, RequestStatus};
use super::{Action, Store};

/// How a successful create or delete is reflected in the in-memory page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPolicy {
    /// Apply the write locally without re-querying: a created post is
    /// prepended and a deleted one removed, adjusting the total count.
    /// Assumes a new post is always the most recent one.
    #[default]
    OptimisticPrepend,
    /// Leave the page untouched and re-fetch the current page after the write.
    RefetchOnMutation,
}

impl MutationPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "optimistic-prepend" | "optimistic" => Some(MutationPolicy::OptimisticPrepend),
            "refetch" | "refetch-on-mutation" => Some(MutationPolicy::RefetchOnMutation),
            _ => None,
        }
    }
}

/// Status of each post request kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogRequests {
    pub fetch: RequestStatus,
    pub create: RequestStatus,
    pub update: RequestStatus,
    pub delete: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogState {
    /// The current page of posts, newest first.
    pub posts: Vec<Post>,
    pub current_post: Option<Post>,
    /// True while a fetch is in flight.
    pub loading: bool,
    pub error: Option<String>,
    pub total_count: u64,
    /// 1-based, never checked against `total_count`.
    pub current_page: u32,
    pub posts_per_page: u32,
    pub policy: MutationPolicy,
    pub requests: BlogRequests,
}

impl BlogState {
    pub fn new(posts_per_page: u32, policy: MutationPolicy) -> Self {
        Self {
            posts: Vec::new(),
            current_post: None,
            loading: false,
            error: None,
            total_count: 0,
            current_page: 1,
            posts_per_page,
            policy,
            requests: BlogRequests::default(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        crate::domain::total_pages(self.total_count, self.posts_per_page)
    }
}

impl Default for BlogState {
    fn default() -> Self {
        Self::new(10, MutationPolicy::default())
    }
}

/// Actions understood by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogAction {
    FetchPostsPending { page: u32, per_page: u32 },
    FetchPostsFulfilled { posts: Vec<Post>, count: Option<u64> },
    FetchPostsRejected { message: String },
    CreatePostPending,
    CreatePostFulfilled { post: Post },
    CreatePostRejected { message: String },
    UpdatePostPending { id: PostId },
    UpdatePostFulfilled { post: Post },
    UpdatePostRejected { message: String },
    DeletePostPending { id: PostId },
    /// `removed` is the number of rows the backend reported deleted.
    DeletePostFulfilled { id: PostId, removed: u64 },
    DeletePostRejected { message: String },
    SetPage { page: u32 },
    SetCurrentPost { post: Option<Post> },
    ClearError,
}

impl BlogAction {
    pub fn name(&self) -> &'static str {
        match self {
            BlogAction::FetchPostsPending { .. } => "blog/fetchPosts/pending",
            BlogAction::FetchPostsFulfilled { .. } => "blog/fetchPosts/fulfilled",
            BlogAction::FetchPostsRejected { .. } => "blog/fetchPosts/rejected",
            BlogAction::CreatePostPending => "blog/createPost/pending",
            BlogAction::CreatePostFulfilled { .. } => "blog/createPost/fulfilled",
            BlogAction::CreatePostRejected { .. } => "blog/createPost/rejected",
            BlogAction::UpdatePostPending { .. } => "blog/updatePost/pending",
            BlogAction::UpdatePostFulfilled { .. } => "blog/updatePost/fulfilled",
            BlogAction::UpdatePostRejected { .. } => "blog/updatePost/rejected",
            BlogAction::DeletePostPending { .. } => "blog/deletePost/pending",
            BlogAction::DeletePostFulfilled { .. } => "blog/deletePost/fulfilled",
            BlogAction::DeletePostRejected { .. } => "blog/deletePost/rejected",
            BlogAction::SetPage { .. } => "blog/setPage",
            BlogAction::SetCurrentPost { .. } => "blog/setCurrentPost",
            BlogAction::ClearError => "blog/clearError",
        }
    }
}

/// Apply one action to the post container.
pub fn reduce(state: &mut BlogState, action: BlogAction) {
    match action {
        BlogAction::FetchPostsPending { .. } => {
            state.loading = true;
            state.error = None;
            state.requests.fetch = RequestStatus::Pending;
        }
        BlogAction::FetchPostsFulfilled { posts, count } => {
            state.loading = false;
            state.posts = posts;
            state.total_count = count.unwrap_or(0);
            state.requests.fetch = RequestStatus::Succeeded;
        }
        BlogAction::FetchPostsRejected { message } => {
            // The previous page stays visible.
            state.loading = false;
            state.requests.fetch = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        BlogAction::CreatePostPending => {
            state.requests.create = RequestStatus::Pending;
        }
        BlogAction::CreatePostFulfilled { post } => {
            if state.policy == MutationPolicy::OptimisticPrepend {
                state.posts.insert(0, post);
                state.total_count += 1;
            }
            state.requests.create = RequestStatus::Succeeded;
        }
        BlogAction::CreatePostRejected { message } => {
            state.requests.create = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        BlogAction::UpdatePostPending { .. } => {
            state.requests.update = RequestStatus::Pending;
        }
        BlogAction::UpdatePostFulfilled { post } => {
            if let Some(slot) = state.posts.iter_mut().find(|p| p.id == post.id) {
                *slot = post.clone();
            }
            state.current_post = Some(post);
            state.requests.update = RequestStatus::Succeeded;
        }
        BlogAction::UpdatePostRejected { message } => {
            state.requests.update = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        BlogAction::DeletePostPending { .. } => {
            state.requests.delete = RequestStatus::Pending;
        }
        BlogAction::DeletePostFulfilled { id, removed } => {
            if state.policy == MutationPolicy::OptimisticPrepend {
                state.posts.retain(|p| p.id != id);
                // Only a confirmed deletion shrinks the total.
                if removed > 0 {
                    state.total_count = state.total_count.saturating_sub(1);
                }
            }
            state.requests.delete = RequestStatus::Succeeded;
        }
        BlogAction::DeletePostRejected { message } => {
            state.requests.delete = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        BlogAction::SetPage { page } => {
            state.current_page = page;
        }
        BlogAction::SetCurrentPost { post } => {
            state.current_post = post;
        }
        BlogAction::ClearError => {
            state.error = None;
        }
    }
}

impl Store {
    /// Load one page of posts, newest first, replacing the in-memory page.
    pub async fn fetch_posts(&self, page: u32, per_page: u32) -> Result<PostPage, RequestError> {
        let request = PageRequest::new(page, per_page)
            .map_err(|e| RequestError::validation(Operation::FetchPosts, e))?;
        let range = request.range();

        self.dispatch(BlogAction::FetchPostsPending { page, per_page });
        tracing::debug!(page, per_page, start = range.start, end = range.end, "Fetching posts");

        match self.posts.list(range).await {
            Ok(result) => {
                self.dispatch(BlogAction::FetchPostsFulfilled {
                    posts: result.posts.clone(),
                    count: result.total,
                });
                Ok(result)
            }
            Err(err) => Err(self.reject(Operation::FetchPosts, &err, |message| {
                BlogAction::FetchPostsRejected { message }
            })),
        }
    }

    /// Load the page the container currently points at.
    pub async fn fetch_current_page(&self) -> Result<PostPage, RequestError> {
        let (page, per_page) = {
            let state = self.state.borrow();
            (state.blog.current_page, state.blog.posts_per_page)
        };
        self.fetch_posts(page, per_page).await
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<Post, RequestError> {
        let new_post = NewPost::new(title, content)
            .map_err(|e| RequestError::validation(Operation::CreatePost, e))?;

        self.dispatch(BlogAction::CreatePostPending);
        let post = match self.posts.insert(new_post).await {
            Ok(post) => post,
            Err(err) => {
                return Err(self.reject(Operation::CreatePost, &err, |message| {
                    BlogAction::CreatePostRejected { message }
                }));
            }
        };

        tracing::info!(post_id = %post.id, "Post created");
        self.dispatch(BlogAction::CreatePostFulfilled { post: post.clone() });
        self.refetch_after_mutation(Operation::CreatePost).await;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: &PostId,
        title: &str,
        content: &str,
    ) -> Result<Post, RequestError> {
        let patch = PostPatch::new(title, content)
            .map_err(|e| RequestError::validation(Operation::UpdatePost, e))?;

        self.dispatch(BlogAction::UpdatePostPending { id: id.clone() });
        match self.posts.update(id, patch).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, "Post updated");
                self.dispatch(BlogAction::UpdatePostFulfilled { post: post.clone() });
                Ok(post)
            }
            Err(err) => Err(self.reject(Operation::UpdatePost, &err, |message| {
                BlogAction::UpdatePostRejected { message }
            })),
        }
    }

    /// Delete a post. Returns how many rows the backend removed.
    pub async fn delete_post(&self, id: &PostId) -> Result<u64, RequestError> {
        self.dispatch(BlogAction::DeletePostPending { id: id.clone() });
        let removed = match self.posts.delete(id).await {
            Ok(removed) => removed,
            Err(err) => {
                return Err(self.reject(Operation::DeletePost, &err, |message| {
                    BlogAction::DeletePostRejected { message }
                }));
            }
        };

        if removed == 0 {
            tracing::warn!(post_id = %id, "Delete matched no rows");
        } else {
            tracing::info!(post_id = %id, removed, "Post deleted");
        }
        self.dispatch(BlogAction::DeletePostFulfilled {
            id: id.clone(),
            removed,
        });
        self.refetch_after_mutation(Operation::DeletePost).await;
        Ok(removed)
    }

    /// Point the container at another page. No bounds check against the total.
    pub fn set_page(&self, page: u32) {
        self.dispatch(BlogAction::SetPage { page });
    }

    pub fn set_current_post(&self, post: Option<Post>) {
        self.dispatch(BlogAction::SetCurrentPost { post });
    }

    pub fn clear_blog_error(&self) {
        self.dispatch(BlogAction::ClearError);
    }

    async fn refetch_after_mutation(&self, operation: Operation) {
        if self.state.borrow().blog.policy != MutationPolicy::RefetchOnMutation {
            return;
        }
        // A failed re-fetch records its own error; the write itself succeeded.
        if let Err(err) = self.fetch_current_page().await {
            tracing::warn!(%operation, error = %err, "Re-fetch after mutation failed");
        }
    }
}

impl From<BlogAction> for Action {
    fn from(action: BlogAction) -> Self {
        Action::Blog(action)
    }
}

#[cfg(test)]
mod tests;
