//! Plain-text rendering of page views.

use std::fmt::Write;

use blog_core::pages::{HomeView, NavLinks, POST_NOT_FOUND, PostDetailPage};

pub fn nav(links: &NavLinks) -> String {
    match links {
        NavLinks::SignedIn { email } => format!("Blog | New Post | {email} | Sign Out"),
        NavLinks::SignedOut => "Blog | Sign In | Sign Up".to_string(),
    }
}

pub fn home(view: &HomeView) -> String {
    if view.loading {
        return "Loading...".to_string();
    }

    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if view.posts.is_empty() {
        out.push_str("No posts yet.");
        return out;
    }

    for post in &view.posts {
        let _ = writeln!(out, "{}  ({})", post.title, post.posted_on);
        let _ = writeln!(out, "  {}", post.excerpt);
        let _ = writeln!(out, "  -> {}", post.id);
        out.push('\n');
    }

    if view.show_pagination() {
        let previous = if view.has_previous { "< Previous" } else { "" };
        let next = if view.has_next { "Next >" } else { "" };
        let _ = write!(
            out,
            "{previous}  Page {} of {}  {next}",
            view.current_page, view.total_pages
        );
    }
    out.trim_end().to_string()
}

pub fn detail(page: &PostDetailPage) -> String {
    if let Some(error) = page.error() {
        return format!("Error: {error}");
    }
    match page.post() {
        Some(post) => {
            let mut out = format!("{}\n{}\n\n{}", post.title, post.posted_on(), post.content);
            if page.can_manage() {
                out.push_str("\n\n[Edit] [Delete]");
            }
            out
        }
        None => POST_NOT_FOUND.to_string(),
    }
}
