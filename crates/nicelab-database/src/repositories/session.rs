//! Lab session repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use nicelab_core::error::{AppError, ErrorKind};
use nicelab_core::result::AppResult;
use nicelab_entity::{LabSession, LabSessionRow};

use crate::store::SessionStore;

const SESSION_SELECT: &str = "SELECT s.id, s.created_at, \
     u.id AS user_id, u.uuid AS user_uuid, u.name AS user_name, \
     u.email AS user_email, u.role AS user_role, \
     l.id AS lab_id, l.uuid AS lab_uuid, l.name AS lab_name, \
     l.platform AS lab_platform, l.hostname AS lab_hostname, \
     l.instance_id AS lab_instance_id, l.available AS lab_available \
     FROM sessions s \
     JOIN users u ON u.id = s.user_id \
     JOIN labs l ON l.id = s.lab_id";

/// Repository for the session registry.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, user_id: i64, lab_id: i64) -> AppResult<LabSession> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sessions (user_id, lab_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(lab_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert session", e))?;

        let row = sqlx::query_as::<_, LabSessionRow>(&format!("{SESSION_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read back session", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit session", e)
        })?;

        Ok(row.into())
    }

    async fn list(&self) -> AppResult<Vec<LabSession>> {
        let rows = sqlx::query_as::<_, LabSessionRow>(&format!(
            "{SESSION_SELECT} ORDER BY s.created_at DESC, s.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))?;

        Ok(rows.into_iter().map(LabSession::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<LabSession>> {
        let row = sqlx::query_as::<_, LabSessionRow>(&format!("{SESSION_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))?;

        Ok(row.map(LabSession::from))
    }
}
