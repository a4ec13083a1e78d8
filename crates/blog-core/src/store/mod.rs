//! Application state - the auth and post containers behind one [`Store`].
//!
//! Reducers are pure functions of `(state, action)`. The store applies them
//! one at a time through a watch channel, so every dispatch is serialized and
//! subscribers observe each resulting state. Async operations dispatch a
//! `*Pending` action, await the backend, then dispatch `*Fulfilled` or
//! `*Rejected`. Overlapping requests are neither de-duplicated nor cancelled:
//! whichever settles last wins.

pub mod auth;
pub mod blog;
mod listener;
mod status;

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::BackendError;
use crate::ports::{AuthBackend, PostBackend};

pub use auth::{AuthAction, AuthRequests, AuthState};
pub use blog::{BlogAction, BlogRequests, BlogState, MutationPolicy};
pub use listener::AuthListener;
pub use status::{Operation, RequestError, RequestStatus};

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub posts_per_page: u32,
    pub mutation_policy: MutationPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            mutation_policy: MutationPolicy::default(),
        }
    }
}

/// Snapshot of every container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub auth: AuthState,
    pub blog: BlogState,
}

/// Any action the store can apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Auth(AuthAction),
    Blog(BlogAction),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Auth(action) => action.name(),
            Action::Blog(action) => action.name(),
        }
    }
}

/// Apply one action to the root state.
pub fn reduce(state: &mut RootState, action: Action) {
    match action {
        Action::Auth(action) => auth::reduce(&mut state.auth, action),
        Action::Blog(action) => blog::reduce(&mut state.blog, action),
    }
}

/// Explicit application state, shared by reference with whoever renders it.
pub struct Store {
    state: watch::Sender<RootState>,
    posts: Arc<dyn PostBackend>,
    auth: Arc<dyn AuthBackend>,
}

impl Store {
    pub fn new(
        posts: Arc<dyn PostBackend>,
        auth: Arc<dyn AuthBackend>,
        config: StoreConfig,
    ) -> Self {
        let initial = RootState {
            auth: AuthState::default(),
            blog: BlogState::new(config.posts_per_page, config.mutation_policy),
        };

        Self {
            state: watch::Sender::new(initial),
            posts,
            auth,
        }
    }

    /// Apply an action synchronously and notify subscribers.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        tracing::debug!(action = action.name(), "Dispatch");
        self.state.send_modify(|state| reduce(state, action));
    }

    pub fn state(&self) -> RootState {
        self.state.borrow().clone()
    }

    pub fn auth_state(&self) -> AuthState {
        self.state.borrow().auth.clone()
    }

    pub fn blog_state(&self) -> BlogState {
        self.state.borrow().blog.clone()
    }

    /// Observe every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    pub fn posts_backend(&self) -> &Arc<dyn PostBackend> {
        &self.posts
    }

    pub fn auth_backend(&self) -> &Arc<dyn AuthBackend> {
        &self.auth
    }

    /// Record a backend failure in its container and build the caller's rejection.
    fn reject<A>(
        &self,
        operation: Operation,
        err: &BackendError,
        action: impl FnOnce(String) -> A,
    ) -> RequestError
    where
        A: Into<Action>,
    {
        let message = operation.failure_message(err);
        tracing::warn!(%operation, error = %err, "Request rejected");
        self.dispatch(action(message.clone()));
        RequestError::Rejected { operation, message }
    }
}
