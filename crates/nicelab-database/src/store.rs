//! Store traits for identities, tokens, labs, and sessions.
//!
//! The PostgreSQL repositories and [`MemoryBackend`](crate::MemoryBackend)
//! both implement every trait here; callers hold them as trait objects.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;

use nicelab_core::result::AppResult;
use nicelab_entity::{AuthToken, Lab, LabSession, TokenOwner, User};

use crate::memory::MemoryBackend;
use crate::repositories::{LabRepository, SessionRepository, TokenRepository, UserRepository};

/// Credential store: user records and their password hashes.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// List every user ordered by id.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Fetch the stored password hash for `email`, if the user exists.
    async fn password_hash_by_email(&self, email: &str) -> AppResult<Option<String>>;
}

/// Token store: the authoritative record of live session tokens.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve a token to its owner. Expired tokens resolve to `None`.
    async fn owner_of(&self, token: &str) -> AppResult<Option<User>>;

    /// List every non-expired token together with its owner.
    async fn list_token_owners(&self) -> AppResult<Vec<TokenOwner>>;

    /// Replace any tokens held by `user_id` with a fresh one valid for `ttl`.
    ///
    /// Deletion and insertion happen atomically.
    async fn reissue(&self, user_id: i64, ttl: Duration) -> AppResult<AuthToken>;
}

/// Lab registry.
#[async_trait]
pub trait LabStore: Send + Sync + std::fmt::Debug + 'static {
    async fn list(&self) -> AppResult<Vec<Lab>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Lab>>;
}

/// Session registry.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record a reservation and return it with user and lab joined in.
    async fn create(&self, user_id: i64, lab_id: i64) -> AppResult<LabSession>;

    /// List every session, newest first.
    async fn list(&self) -> AppResult<Vec<LabSession>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<LabSession>>;
}

/// One handle per store, as consumed by the service layer.
#[derive(Debug, Clone)]
pub struct StoreSet {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub labs: Arc<dyn LabStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl StoreSet {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            tokens: Arc::new(TokenRepository::new(pool.clone())),
            labs: Arc::new(LabRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
        }
    }

    /// Every store backed by the same in-memory backend.
    pub fn memory(backend: MemoryBackend) -> Self {
        let backend = Arc::new(backend);
        Self {
            users: backend.clone(),
            tokens: backend.clone(),
            labs: backend.clone(),
            sessions: backend,
        }
    }
}
