use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use blog_core::BackendError;
use blog_core::domain::{
    AuthEvent, Credentials, NewPost, Post, PostId, PostPage, PostPatch, RowRange, Session,
    SignUpOutcome, User, mask_email,
};
use blog_core::ports::{AuthBackend, AuthSubscription, PostBackend};

use crate::auth::{Argon2PasswordHasher, JwtConfig, SessionTokens};

/// Settings for [`InMemoryBackend`].
#[derive(Debug, Clone)]
pub struct InMemoryConfig {
    pub jwt: JwtConfig,
    pub min_password_len: usize,
    /// Sign up starts a session immediately instead of waiting for confirmation.
    pub auto_confirm: bool,
    /// Buffered auth events per subscriber.
    pub event_buffer: usize,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            min_password_len: 6,
            auto_confirm: true,
            event_buffer: 64,
        }
    }
}

impl InMemoryConfig {
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            ..Self::default()
        }
    }
}

struct Account {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    /// Insertion order.
    posts: Vec<Post>,
    /// Keyed by lowercased e-mail.
    accounts: HashMap<String, Account>,
    session: Option<Session>,
}

/// Posts table and auth service held in process memory.
pub struct InMemoryBackend {
    tables: RwLock<Tables>,
    available: AtomicBool,
    passwords: Argon2PasswordHasher,
    tokens: SessionTokens,
    changes: broadcast::Sender<AuthEvent>,
    config: InMemoryConfig,
}

impl InMemoryBackend {
    pub fn new(config: InMemoryConfig) -> Self {
        let (changes, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
            passwords: Argon2PasswordHasher::new(),
            tokens: SessionTokens::new(config.jwt.clone()),
            changes,
            config,
        }
    }

    /// While unavailable every call fails with [`BackendError::Connection`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Insert a row as-is, bypassing ownership checks.
    pub async fn seed(&self, post: Post) {
        self.tables.write().await.posts.push(post);
    }

    fn ensure_available(&self) -> Result<(), BackendError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Connection("backend unavailable".to_string()))
        }
    }

    fn emit(&self, event: AuthEvent) {
        // No receivers is fine.
        let _ = self.changes.send(event);
    }

    fn start_session(&self, user: &User) -> Result<Session, BackendError> {
        let (access_token, expires_at) = self.tokens.issue(user)?;
        Ok(Session {
            access_token,
            refresh_token: None,
            expires_at: Some(expires_at),
            user: user.clone(),
        })
    }

    /// User of the current session, if it is still valid.
    fn session_user(&self, tables: &Tables) -> Option<User> {
        let session = tables.session.as_ref()?;
        self.tokens
            .verify(&session.access_token)
            .ok()
            .map(|_| session.user.clone())
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(InMemoryConfig::default())
    }
}

#[async_trait]
impl PostBackend for InMemoryBackend {
    async fn list(&self, range: RowRange) -> Result<PostPage, BackendError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;

        // Stable sort over reversed insertion order: equal timestamps list the
        // most recently inserted row first.
        let mut rows: Vec<&Post> = tables.posts.iter().rev().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let posts = rows
            .into_iter()
            .skip(range.start as usize)
            .take(range.len() as usize)
            .cloned()
            .collect();

        Ok(PostPage {
            posts,
            total: Some(tables.posts.len() as u64),
        })
    }

    async fn find(&self, id: &PostId) -> Result<Option<Post>, BackendError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, BackendError> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let owner = self
            .session_user(&tables)
            .ok_or(BackendError::Unauthenticated)?;

        let now = Utc::now();
        let row = Post {
            id: PostId::new(Uuid::new_v4().to_string()),
            user_id: owner.id,
            title: post.title,
            content: post.content,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(row.clone());

        tracing::debug!(post_id = %row.id, "Inserted post");
        Ok(row)
    }

    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post, BackendError> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let owner = self
            .session_user(&tables)
            .ok_or(BackendError::Unauthenticated)?;

        // Rows owned by someone else are invisible to the update.
        let row = tables
            .posts
            .iter_mut()
            .find(|p| &p.id == id && p.user_id == owner.id)
            .ok_or(BackendError::NotFound)?;

        row.title = patch.title;
        row.content = patch.content;
        row.updated_at = Utc::now();

        tracing::debug!(post_id = %id, "Updated post");
        Ok(row.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<u64, BackendError> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let owner = self
            .session_user(&tables)
            .ok_or(BackendError::Unauthenticated)?;

        let before = tables.posts.len();
        tables
            .posts
            .retain(|p| !(&p.id == id && p.user_id == owner.id));
        let removed = (before - tables.posts.len()) as u64;

        tracing::debug!(post_id = %id, removed, "Deleted post");
        Ok(removed)
    }
}

#[async_trait]
impl AuthBackend for InMemoryBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError> {
        self.ensure_available()?;

        let email = credentials.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(BackendError::Auth(
                "Unable to validate email address: invalid format".to_string(),
            ));
        }
        if credentials.password.chars().count() < self.config.min_password_len {
            return Err(BackendError::Auth(format!(
                "Password should be at least {} characters",
                self.config.min_password_len
            )));
        }

        // Hashing is slow; keep it outside the lock.
        let password_hash = self.passwords.hash(&credentials.password)?;

        let mut tables = self.tables.write().await;
        if tables.accounts.contains_key(&email) {
            return Err(BackendError::Auth("User already registered".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            created_at: Some(Utc::now()),
        };
        tables.accounts.insert(
            email,
            Account {
                user: user.clone(),
                password_hash,
            },
        );
        tracing::info!(email = %mask_email(&user.email), "Account registered");

        if !self.config.auto_confirm {
            return Ok(SignUpOutcome {
                user: Some(user),
                session: None,
            });
        }

        let session = self.start_session(&user)?;
        tables.session = Some(session.clone());
        drop(tables);

        self.emit(AuthEvent::signed_in(session.clone()));
        Ok(SignUpOutcome {
            user: Some(user),
            session: Some(session),
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        self.ensure_available()?;

        let email = credentials.email.trim().to_lowercase();
        let account = self
            .tables
            .read()
            .await
            .accounts
            .get(&email)
            .map(|a| (a.user.clone(), a.password_hash.clone()));

        let user = match account {
            Some((user, hash)) if self.passwords.verify(&credentials.password, &hash)? => user,
            _ => return Err(BackendError::Auth("Invalid login credentials".to_string())),
        };

        let session = self.start_session(&user)?;
        let mut tables = self.tables.write().await;
        tables.session = Some(session.clone());
        drop(tables);

        self.emit(AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.ensure_available()?;

        let previous = self.tables.write().await.session.take();
        if previous.is_some() {
            self.emit(AuthEvent::signed_out());
        }
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        self.ensure_available()?;

        let mut tables = self.tables.write().await;
        let Some(session) = tables.session.clone() else {
            return Ok(None);
        };

        match self.tokens.verify(&session.access_token) {
            Ok(_) => Ok(Some(session)),
            Err(err) => {
                tracing::info!(error = %err, "Dropping stale session");
                tables.session = None;
                drop(tables);
                self.emit(AuthEvent::signed_out());
                Ok(None)
            }
        }
    }

    fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.changes.subscribe())
    }
}
