//! Auth token repository implementation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use nicelab_core::error::{AppError, ErrorKind};
use nicelab_core::result::AppResult;
use nicelab_entity::{AuthToken, TokenOwner, User};

use crate::store::TokenStore;

/// Repository for opaque session tokens.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn owner_of(&self, token: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.uuid, u.name, u.email, u.role \
             FROM auth_tokens t JOIN users u ON u.id = t.user_id \
             WHERE t.token = $1 AND t.expire_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve token", e))
    }

    async fn list_token_owners(&self) -> AppResult<Vec<TokenOwner>> {
        sqlx::query_as::<_, TokenOwner>(
            "SELECT t.token, u.id, u.uuid, u.name, u.email, u.role \
             FROM auth_tokens t JOIN users u ON u.id = t.user_id \
             WHERE t.expire_at > NOW()",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tokens", e))
    }

    async fn reissue(&self, user_id: i64, ttl: Duration) -> AppResult<AuthToken> {
        let token = Uuid::new_v4().to_string();
        let expire_at = Utc::now() + ttl;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete old tokens", e)
            })?;

        let issued = sqlx::query_as::<_, AuthToken>(
            "INSERT INTO auth_tokens (token, user_id, expire_at) VALUES ($1, $2, $3) \
             RETURNING token, user_id, expire_at",
        )
        .bind(&token)
        .bind(user_id)
        .bind(expire_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert token", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit token reissue", e)
        })?;

        Ok(issued)
    }
}
