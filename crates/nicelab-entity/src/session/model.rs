//! Lab session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::lab::{Lab, LabPlatform};
use crate::user::{User, UserRole};

/// A reservation of a lab by a user, with both sides joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabSession {
    /// Numeric primary key.
    pub id: i64,
    /// The identity that reserved the lab.
    pub user: User,
    /// The reserved lab.
    pub lab: Lab,
    /// When the reservation was recorded.
    pub created_at: DateTime<Utc>,
}

impl LabSession {
    /// Check whether `user_id` owns this session.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user.id == user_id
    }
}

/// Flat row produced by the sessions/users/labs join.
#[derive(Debug, Clone, FromRow)]
pub struct LabSessionRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub user_uuid: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_role: UserRole,
    pub lab_id: i64,
    pub lab_uuid: Uuid,
    pub lab_name: String,
    pub lab_platform: LabPlatform,
    pub lab_hostname: String,
    pub lab_instance_id: String,
    pub lab_available: bool,
}

impl From<LabSessionRow> for LabSession {
    fn from(row: LabSessionRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            user: User {
                id: row.user_id,
                uuid: row.user_uuid,
                name: row.user_name,
                email: row.user_email,
                role: row.user_role,
            },
            lab: Lab {
                id: row.lab_id,
                uuid: row.lab_uuid,
                name: row.lab_name,
                platform: row.lab_platform,
                hostname: row.lab_hostname,
                instance_id: row.lab_instance_id,
                available: row.lab_available,
            },
        }
    }
}
