//! Lab repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use nicelab_core::error::{AppError, ErrorKind};
use nicelab_core::result::AppResult;
use nicelab_entity::Lab;

use crate::store::LabStore;

/// Repository for lab reference data.
#[derive(Debug, Clone)]
pub struct LabRepository {
    pool: PgPool,
}

impl LabRepository {
    /// Create a new lab repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LabStore for LabRepository {
    async fn list(&self) -> AppResult<Vec<Lab>> {
        sqlx::query_as::<_, Lab>(
            "SELECT id, uuid, name, platform, hostname, instance_id, available FROM labs ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list labs", e))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Lab>> {
        sqlx::query_as::<_, Lab>(
            "SELECT id, uuid, name, platform, hostname, instance_id, available FROM labs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find lab", e))
    }
}
