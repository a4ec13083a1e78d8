//! Scripted backend for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tokio::sync::{Notify, broadcast};
use uuid::Uuid;

use crate::domain::{
    AuthEvent, Credentials, NewPost, Post, PostId, PostPage, PostPatch, RowRange, Session,
    SignUpOutcome, User,
};
use crate::error::BackendError;
use crate::ports::{AuthBackend, AuthSubscription, PostBackend};
use crate::store::{Store, StoreConfig};

pub(crate) fn user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        created_at: None,
    }
}

pub(crate) fn session_for(user: &User) -> Session {
    Session {
        access_token: format!("token-{}", user.id),
        refresh_token: None,
        expires_at: Some(Utc::now() + TimeDelta::hours(1)),
        user: user.clone(),
    }
}

pub(crate) fn post(id: &str, title: &str, owner: Uuid) -> Post {
    let now = Utc::now();
    Post {
        id: PostId::new(id),
        user_id: owner,
        title: title.to_string(),
        content: format!("{title} content"),
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
struct FakeInner {
    posts: Mutex<Vec<Post>>,
    next_id: Mutex<u64>,
    ranges: Mutex<Vec<RowRange>>,
    failures: Mutex<HashMap<&'static str, BackendError>>,
    delete_result: Mutex<Option<u64>>,
    omit_count: Mutex<bool>,
    session: Mutex<Option<Session>>,
    gate: Mutex<Option<Arc<Notify>>>,
    changes: Mutex<Option<broadcast::Sender<AuthEvent>>>,
}

/// In-process backend whose rows, failures and timing are set by the test.
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    inner: Arc<FakeInner>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        let backend = Self::default();
        *backend.inner.changes.lock().unwrap() = Some(broadcast::channel(16).0);
        backend
    }

    pub(crate) fn store(&self, config: StoreConfig) -> Store {
        Store::new(Arc::new(self.clone()), Arc::new(self.clone()), config)
    }

    /// Rows in the order `list` returns them (newest first).
    pub(crate) fn seed(&self, posts: Vec<Post>) {
        *self.inner.posts.lock().unwrap() = posts;
    }

    pub(crate) fn rows(&self) -> Vec<Post> {
        self.inner.posts.lock().unwrap().clone()
    }

    pub(crate) fn fail(&self, method: &'static str, err: BackendError) {
        self.inner.failures.lock().unwrap().insert(method, err);
    }

    pub(crate) fn recover(&self, method: &'static str) {
        self.inner.failures.lock().unwrap().remove(method);
    }

    pub(crate) fn ranges(&self) -> Vec<RowRange> {
        self.inner.ranges.lock().unwrap().clone()
    }

    pub(crate) fn report_deleted(&self, removed: u64) {
        *self.inner.delete_result.lock().unwrap() = Some(removed);
    }

    pub(crate) fn omit_count(&self) {
        *self.inner.omit_count.lock().unwrap() = true;
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *self.inner.session.lock().unwrap() = session;
    }

    /// Calls block until the returned gate is notified, once per call.
    pub(crate) fn pause(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.inner.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        if let Some(sender) = self.inner.changes.lock().unwrap().as_ref() {
            let _ = sender.send(event);
        }
    }

    async fn checkpoint(&self, method: &'static str) -> Result<(), BackendError> {
        let gate = self.inner.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.inner.failures.lock().unwrap().get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn owner(&self) -> Uuid {
        self.inner
            .session
            .lock()
            .unwrap()
            .as_ref()
            .map_or(Uuid::nil(), |s| s.user.id)
    }
}

#[async_trait]
impl PostBackend for FakeBackend {
    async fn list(&self, range: RowRange) -> Result<PostPage, BackendError> {
        self.inner.ranges.lock().unwrap().push(range);
        self.checkpoint("list").await?;

        let rows = self.inner.posts.lock().unwrap();
        let posts = rows
            .iter()
            .skip(range.start as usize)
            .take(range.len() as usize)
            .cloned()
            .collect();
        let total = if *self.inner.omit_count.lock().unwrap() {
            None
        } else {
            Some(rows.len() as u64)
        };
        Ok(PostPage { posts, total })
    }

    async fn find(&self, id: &PostId) -> Result<Option<Post>, BackendError> {
        self.checkpoint("find").await?;
        let rows = self.inner.posts.lock().unwrap();
        Ok(rows.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, BackendError> {
        self.checkpoint("insert").await?;
        let id = {
            let mut next = self.inner.next_id.lock().unwrap();
            *next += 1;
            format!("new-{next}")
        };
        let mut created = post(&id, &new_post.title, self.owner());
        created.content = new_post.content;
        self.inner.posts.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post, BackendError> {
        self.checkpoint("update").await?;
        let mut rows = self.inner.posts.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(BackendError::NotFound)?;
        row.title = patch.title;
        row.content = patch.content;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<u64, BackendError> {
        self.checkpoint("delete").await?;
        let mut rows = self.inner.posts.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| &p.id != id);
        let removed = (before - rows.len()) as u64;
        Ok(self.inner.delete_result.lock().unwrap().unwrap_or(removed))
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError> {
        self.checkpoint("sign_up").await?;
        Ok(SignUpOutcome {
            user: Some(user(&credentials.email)),
            session: None,
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        self.checkpoint("sign_in").await?;
        let session = session_for(&user(&credentials.email));
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.checkpoint("sign_out").await?;
        self.set_session(None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        self.checkpoint("get_session").await?;
        Ok(self.inner.session.lock().unwrap().clone())
    }

    fn subscribe(&self) -> AuthSubscription {
        let guard = self.inner.changes.lock().unwrap();
        let receiver = match guard.as_ref() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        };
        AuthSubscription::new(receiver)
    }
}
