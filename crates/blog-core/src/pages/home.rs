use std::sync::Arc;

use crate::domain::{Post, PostId, PostPage};
use crate::store::{RequestError, Store};

/// Characters of content shown per post in the listing.
pub const EXCERPT_CHARS: usize = 200;

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub posted_on: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt(EXCERPT_CHARS).into_owned(),
            posted_on: post.posted_on(),
        }
    }
}

/// Everything the home listing renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub loading: bool,
    pub error: Option<String>,
    pub posts: Vec<PostSummary>,
    pub current_page: u32,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub can_create: bool,
}

impl HomeView {
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

/// Paginated listing of every post.
pub struct HomePage {
    store: Arc<Store>,
}

impl HomePage {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Fetch the page the store currently points at.
    pub async fn load(&self) -> Result<PostPage, RequestError> {
        self.store.fetch_current_page().await
    }

    /// Move to `page` and load it. Page 0 means the first page.
    pub async fn go_to(&self, page: u32) -> Result<PostPage, RequestError> {
        self.store.set_page(page.max(1));
        self.load().await
    }

    pub async fn next(&self) -> Result<PostPage, RequestError> {
        let page = self.store.blog_state().current_page;
        self.go_to(page.saturating_add(1)).await
    }

    pub async fn previous(&self) -> Result<PostPage, RequestError> {
        let page = self.store.blog_state().current_page;
        self.go_to(page.saturating_sub(1)).await
    }

    pub fn view(&self) -> HomeView {
        let state = self.store.state();
        let blog = &state.blog;
        let total_pages = blog.total_pages();

        HomeView {
            loading: blog.loading,
            error: blog.error.clone(),
            posts: blog.posts.iter().map(PostSummary::from).collect(),
            current_page: blog.current_page,
            total_pages,
            has_previous: blog.current_page > 1,
            has_next: u64::from(blog.current_page) < total_pages,
            can_create: state.auth.user.is_some(),
        }
    }
}
