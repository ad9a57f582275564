//! User entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// An authenticated identity.
///
/// The password hash is deliberately absent; it is only ever read through
/// the credential lookup used at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Numeric primary key.
    pub id: i64,
    /// Globally unique external identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: String,
    /// Role used for authorization decisions.
    pub role: UserRole,
}

impl User {
    /// Check if this user holds the elevated role.
    pub fn is_professor(&self) -> bool {
        self.role.is_professor()
    }
}
