//! Email/password login.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};

use nicelab_core::config::AuthConfig;
use nicelab_core::error::AppError;
use nicelab_core::result::AppResult;
use nicelab_database::{TokenStore, UserStore};
use nicelab_entity::User;

use crate::password::PasswordHasher;
use crate::token::TokenCache;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: User,
    /// Freshly issued opaque token.
    pub token: String,
}

/// Verifies credentials and issues the caller a new session token.
#[derive(Debug, Clone)]
pub struct LoginService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    cache: Arc<TokenCache>,
    hasher: PasswordHasher,
    token_ttl: Duration,
}

impl LoginService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        cache: Arc<TokenCache>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            cache,
            hasher: PasswordHasher::new(),
            token_ttl: Duration::hours(config.token_ttl_hours as i64),
        }
    }

    /// Log in with email and password.
    ///
    /// 1. Load the stored hash and verify the password
    /// 2. Reissue the user's token (invalidates any previous one)
    /// 3. Evict the user's stale tokens from the cache
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let hash = self
            .users
            .password_hash_by_email(email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        if !self.hasher.verify_password(password, &hash)? {
            warn!("Login rejected: password mismatch");
            return Err(AppError::authentication("Invalid email or password"));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        let issued = self.tokens.reissue(user.id, self.token_ttl).await?;
        self.cache.evict_user(user.id);

        info!(user_id = user.id, "Login successful");
        Ok(LoginResult {
            user,
            token: issued.token,
        })
    }
}
