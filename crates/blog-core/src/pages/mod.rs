//! Headless page controllers.
//!
//! Each controller holds the page-local state a view renders (form fields,
//! loading and error text) and returns a [`Navigation`] where the page would
//! redirect. Pages that load data directly carry an unmount token: once it is
//! cancelled, an in-flight load is abandoned and its result never applied.

mod create;
mod detail;
mod edit;
mod home;
mod navbar;

use crate::domain::PostId;

pub use create::CreatePostForm;
pub use detail::PostDetailPage;
pub use edit::{EditPostPage, NO_PERMISSION};
pub use home::{EXCERPT_CHARS, HomePage, HomeView, PostSummary};
pub use navbar::{NavBar, NavLinks};

/// Where a page sends the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Home,
    Post(PostId),
    SignIn,
}

/// Message shown when a post cannot be loaded because it does not exist.
pub const POST_NOT_FOUND: &str = "Post not found";
