use std::sync::Arc;

use uuid::Uuid;

use super::*;
use crate::error::BackendError;
use crate::store::StoreConfig;
use crate::testing::{FakeBackend, post, session_for, user};

fn seeded(count: usize) -> FakeBackend {
    let backend = FakeBackend::new();
    let owner = Uuid::new_v4();
    backend.seed(
        (0..count)
            .map(|i| post(&format!("p{i}"), &format!("Post {i}"), owner))
            .collect(),
    );
    backend
}

fn refetch_config() -> StoreConfig {
    StoreConfig {
        posts_per_page: 10,
        mutation_policy: MutationPolicy::RefetchOnMutation,
    }
}

#[test]
fn test_initial_state() {
    let state = BlogState::new(10, MutationPolicy::OptimisticPrepend);
    assert!(state.posts.is_empty());
    assert_eq!(state.current_page, 1);
    assert_eq!(state.posts_per_page, 10);
    assert_eq!(state.total_count, 0);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_fetch_posts_requests_exact_range() {
    let backend = seeded(30);
    let store = backend.store(StoreConfig::default());

    store.fetch_posts(3, 7).await.unwrap();

    let range = backend.ranges()[0];
    assert_eq!(range.start, 14);
    assert_eq!(range.end, 20);
    assert_eq!(range.len(), 7);
}

#[tokio::test]
async fn test_fetch_posts_replaces_list_and_count() {
    let backend = seeded(25);
    let store = backend.store(StoreConfig::default());

    store.fetch_posts(2, 10).await.unwrap();

    let state = store.blog_state();
    assert_eq!(state.posts.len(), 10);
    assert_eq!(state.posts[0].id.as_str(), "p10");
    assert_eq!(state.total_count, 25);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.requests.fetch, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_fetch_posts_missing_count_means_zero() {
    let backend = seeded(3);
    backend.omit_count();
    let store = backend.store(StoreConfig::default());

    store.fetch_posts(1, 10).await.unwrap();
    assert_eq!(store.blog_state().total_count, 0);
}

#[tokio::test]
async fn test_fetch_posts_sets_loading_while_pending() {
    let backend = seeded(3);
    let gate = backend.pause();
    let store = Arc::new(backend.store(StoreConfig::default()));

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_posts(1, 10).await }
    });
    while !store.blog_state().loading {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.blog_state().requests.fetch, RequestStatus::Pending);

    gate.notify_one();
    task.await.unwrap().unwrap();
    assert!(!store.blog_state().loading);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_posts() {
    let backend = seeded(5);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();

    backend.fail("list", BackendError::Connection("offline".to_string()));
    let err = store.fetch_posts(1, 10).await.unwrap_err();

    let state = store.blog_state();
    assert_eq!(state.posts.len(), 5);
    assert_eq!(state.total_count, 5);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(err.message()));
    assert!(err.message().starts_with("Failed to fetch posts"));
    assert!(matches!(err, RequestError::Rejected { .. }));
}

#[tokio::test]
async fn test_fetch_page_zero_is_refused_locally() {
    let backend = seeded(5);
    let store = backend.store(StoreConfig::default());

    let err = store.fetch_posts(0, 10).await.unwrap_err();

    assert!(matches!(err, RequestError::Validation { .. }));
    assert!(backend.ranges().is_empty());
    assert_eq!(store.blog_state(), BlogState::default());
}

#[tokio::test]
async fn test_create_post_prepends_and_counts() {
    let backend = seeded(3);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();

    let created = store.create_post("T", "C").await.unwrap();

    let state = store.blog_state();
    assert_eq!(state.posts[0], created);
    assert_eq!(state.posts[0].title, "T");
    assert_eq!(state.posts[0].content, "C");
    assert_eq!(state.total_count, 4);
    assert_eq!(state.requests.create, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_create_post_rejects_blank_fields_without_calling_backend() {
    let backend = seeded(0);
    let store = backend.store(StoreConfig::default());

    let err = store.create_post("  ", "C").await.unwrap_err();

    assert_eq!(err.message(), crate::domain::FIELDS_REQUIRED);
    assert!(backend.rows().is_empty());
    assert_eq!(store.blog_state().error, None);
}

#[tokio::test]
async fn test_create_failure_leaves_list_untouched() {
    let backend = seeded(2);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();
    backend.fail("insert", BackendError::Query("insert denied".to_string()));

    let err = store.create_post("T", "C").await.unwrap_err();

    let state = store.blog_state();
    assert_eq!(state.posts.len(), 2);
    assert_eq!(state.total_count, 2);
    assert_eq!(err.message(), "Failed to create post: insert denied");
    assert_eq!(state.error.as_deref(), Some("Failed to create post: insert denied"));
}

#[tokio::test]
async fn test_create_with_refetch_policy_reloads_page() {
    let backend = seeded(2);
    let store = backend.store(refetch_config());
    store.fetch_posts(1, 10).await.unwrap();

    store.create_post("T", "C").await.unwrap();

    assert_eq!(backend.ranges().len(), 2);
    let state = store.blog_state();
    assert_eq!(state.posts.len(), 3);
    assert_eq!(state.total_count, 3);
}

#[tokio::test]
async fn test_update_post_replaces_by_id_and_selects_it() {
    let backend = seeded(3);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();
    let before = store.blog_state().posts;

    let id = PostId::new("p1");
    let updated = store.update_post(&id, "T2", "C2").await.unwrap();

    let state = store.blog_state();
    assert_eq!(state.posts[1].title, "T2");
    assert_eq!(state.current_post, Some(updated));
    assert_eq!(state.posts[0], before[0]);
    assert_eq!(state.posts[2], before[2]);
}

#[tokio::test]
async fn test_update_absent_from_page_still_selects_post() {
    let backend = seeded(3);
    let store = backend.store(StoreConfig::default());

    let updated = store
        .update_post(&PostId::new("p2"), "T2", "C2")
        .await
        .unwrap();

    let state = store.blog_state();
    assert!(state.posts.is_empty());
    assert_eq!(state.current_post, Some(updated));
}

#[tokio::test]
async fn test_update_failure_is_one_generic_message() {
    let backend = seeded(1);
    let store = backend.store(StoreConfig::default());

    let err = store
        .update_post(&PostId::new("missing"), "T", "C")
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Update failed: Row not found");
    assert_eq!(store.blog_state().current_post, None);
    assert!(matches!(
        store.blog_state().requests.update,
        RequestStatus::Failed(_)
    ));
}

#[tokio::test]
async fn test_delete_post_removes_and_decrements() {
    let backend = seeded(3);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();

    let removed = store.delete_post(&PostId::new("p1")).await.unwrap();

    let state = store.blog_state();
    assert_eq!(removed, 1);
    assert!(state.posts.iter().all(|p| p.id.as_str() != "p1"));
    assert_eq!(state.posts.len(), 2);
    assert_eq!(state.total_count, 2);
}

#[tokio::test]
async fn test_delete_of_absent_id_keeps_count() {
    let backend = seeded(3);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();

    let removed = store.delete_post(&PostId::new("gone")).await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(store.blog_state().total_count, 3);
}

#[test]
fn test_delete_removes_every_matching_entry_once_counted() {
    let owner = Uuid::new_v4();
    let mut state = BlogState::default();
    state.posts = vec![post("x", "a", owner), post("y", "b", owner), post("x", "c", owner)];
    state.total_count = 3;

    reduce(
        &mut state,
        BlogAction::DeletePostFulfilled {
            id: PostId::new("x"),
            removed: 2,
        },
    );

    assert_eq!(state.posts.len(), 1);
    assert_eq!(state.total_count, 2);
}

#[test]
fn test_delete_never_underflows_count() {
    let mut state = BlogState::default();
    reduce(
        &mut state,
        BlogAction::DeletePostFulfilled {
            id: PostId::new("x"),
            removed: 1,
        },
    );
    assert_eq!(state.total_count, 0);
}

#[tokio::test]
async fn test_delete_failure_keeps_post() {
    let backend = seeded(2);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();
    backend.fail("delete", BackendError::Connection("reset".to_string()));

    let err = store.delete_post(&PostId::new("p0")).await.unwrap_err();

    assert!(err.message().starts_with("Delete failed"));
    assert_eq!(store.blog_state().posts.len(), 2);
    assert_eq!(store.blog_state().total_count, 2);
}

#[tokio::test]
async fn test_delete_with_refetch_policy_reloads_page() {
    let backend = seeded(3);
    let store = backend.store(refetch_config());
    store.fetch_posts(1, 10).await.unwrap();

    store.delete_post(&PostId::new("p0")).await.unwrap();

    assert_eq!(backend.ranges().len(), 2);
    assert_eq!(store.blog_state().total_count, 2);
}

#[tokio::test]
async fn test_set_page_is_unchecked() {
    let backend = seeded(3);
    let store = backend.store(StoreConfig::default());
    store.fetch_posts(1, 10).await.unwrap();

    store.set_page(99);
    assert_eq!(store.blog_state().current_page, 99);

    let page = store.fetch_current_page().await.unwrap();
    assert!(page.posts.is_empty());
    assert_eq!(backend.ranges()[1].start, 980);
}

#[test]
fn test_set_current_post_and_clear_error() {
    let mut state = BlogState::default();
    let selected = post("p", "t", Uuid::new_v4());

    reduce(
        &mut state,
        BlogAction::SetCurrentPost {
            post: Some(selected.clone()),
        },
    );
    reduce(
        &mut state,
        BlogAction::FetchPostsRejected {
            message: "boom".to_string(),
        },
    );
    assert_eq!(state.current_post, Some(selected));
    assert_eq!(state.error.as_deref(), Some("boom"));

    reduce(&mut state, BlogAction::ClearError);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_created_post_is_owned_by_session_user() {
    let backend = seeded(0);
    let author = user("author@example.com");
    backend.set_session(Some(session_for(&author)));
    let store = backend.store(StoreConfig::default());

    let created = store.create_post("T", "C").await.unwrap();
    assert!(created.is_owned_by(&author));
}

#[test]
fn test_mutation_policy_parse() {
    assert_eq!(
        MutationPolicy::parse("refetch"),
        Some(MutationPolicy::RefetchOnMutation)
    );
    assert_eq!(
        MutationPolicy::parse(" Optimistic-Prepend "),
        Some(MutationPolicy::OptimisticPrepend)
    );
    assert_eq!(MutationPolicy::parse("eventual"), None);
}
