//! In-memory implementation of every store trait.
//!
//! Honours the same semantics as the PostgreSQL repositories (expiry
//! filtering, delete-then-insert token reissue, joined session read-back)
//! so it can stand in for the database in development and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use nicelab_core::error::AppError;
use nicelab_core::result::AppResult;
use nicelab_entity::{AuthToken, Lab, LabPlatform, LabSession, TokenOwner, User, UserRole};

use crate::store::{LabStore, SessionStore, TokenStore, UserStore};

#[derive(Debug, Default)]
struct InnerState {
    users: BTreeMap<i64, StoredUser>,
    tokens: HashMap<String, AuthToken>,
    labs: BTreeMap<i64, Lab>,
    sessions: BTreeMap<i64, LabSession>,
    next_user_id: i64,
    next_lab_id: i64,
    next_session_id: i64,
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

impl InnerState {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Process-local backend holding users, tokens, labs, and sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with an already-hashed password.
    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
        password_hash: &str,
    ) -> User {
        let mut state = self.state.lock().await;
        let id = InnerState::next_id(&mut state.next_user_id);
        let user = User {
            id,
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        };
        state.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        user
    }

    /// Add a lab. When `id` is `None` the next free id is assigned.
    pub async fn insert_lab(
        &self,
        id: Option<i64>,
        name: &str,
        platform: LabPlatform,
        hostname: &str,
        instance_id: &str,
        available: bool,
    ) -> Lab {
        let mut state = self.state.lock().await;
        let id = match id {
            Some(id) => {
                state.next_lab_id = state.next_lab_id.max(id);
                id
            }
            None => InnerState::next_id(&mut state.next_lab_id),
        };
        let lab = Lab {
            id,
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            platform,
            hostname: hostname.to_string(),
            instance_id: instance_id.to_string(),
            available,
        };
        state.labs.insert(id, lab.clone());
        lab
    }

    /// Store a token row as-is, e.g. one that has already expired.
    pub async fn insert_token(&self, token: AuthToken) {
        let mut state = self.state.lock().await;
        state.tokens.insert(token.token.clone(), token);
    }

    /// Force an existing token's expiry into the past.
    pub async fn expire_token(&self, token: &str) {
        let mut state = self.state.lock().await;
        if let Some(row) = state.tokens.get_mut(token) {
            row.expire_at = Utc::now() - Duration::seconds(1);
        }
    }
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| u.user.clone()))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).map(|u| u.user.clone()))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().map(|u| u.user.clone()).collect())
    }

    async fn password_hash_by_email(&self, email: &str) -> AppResult<Option<String>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| u.password_hash.clone()))
    }
}

#[async_trait]
impl TokenStore for MemoryBackend {
    async fn owner_of(&self, token: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        let now = Utc::now();
        Ok(state
            .tokens
            .get(token)
            .filter(|t| t.is_live_at(now))
            .and_then(|t| state.users.get(&t.user_id))
            .map(|u| u.user.clone()))
    }

    async fn list_token_owners(&self) -> AppResult<Vec<TokenOwner>> {
        let state = self.state.lock().await;
        let now = Utc::now();
        Ok(state
            .tokens
            .values()
            .filter(|t| t.is_live_at(now))
            .filter_map(|t| {
                state.users.get(&t.user_id).map(|u| TokenOwner {
                    token: t.token.clone(),
                    user: u.user.clone(),
                })
            })
            .collect())
    }

    async fn reissue(&self, user_id: i64, ttl: Duration) -> AppResult<AuthToken> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::database(format!(
                "Cannot issue token for unknown user {user_id}"
            )));
        }

        state.tokens.retain(|_, t| t.user_id != user_id);
        let issued = AuthToken {
            token: Uuid::new_v4().to_string(),
            user_id,
            expire_at: Utc::now() + ttl,
        };
        state.tokens.insert(issued.token.clone(), issued.clone());
        debug!(user_id, "Reissued in-memory token");
        Ok(issued)
    }
}

#[async_trait]
impl LabStore for MemoryBackend {
    async fn list(&self) -> AppResult<Vec<Lab>> {
        let state = self.state.lock().await;
        Ok(state.labs.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Lab>> {
        let state = self.state.lock().await;
        Ok(state.labs.get(&id).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryBackend {
    async fn create(&self, user_id: i64, lab_id: i64) -> AppResult<LabSession> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get(&user_id)
            .map(|u| u.user.clone())
            .ok_or_else(|| AppError::database(format!("Unknown user {user_id}")))?;
        let lab = state
            .labs
            .get(&lab_id)
            .cloned()
            .ok_or_else(|| AppError::database(format!("Unknown lab {lab_id}")))?;

        let id = InnerState::next_id(&mut state.next_session_id);
        let session = LabSession {
            id,
            user,
            lab,
            created_at: Utc::now(),
        };
        state.sessions.insert(id, session.clone());
        Ok(session)
    }

    async fn list(&self) -> AppResult<Vec<LabSession>> {
        let state = self.state.lock().await;
        Ok(state.sessions.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<LabSession>> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(&id).cloned())
    }
}
