//! Session token entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::user::User;

/// A persisted opaque session token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthToken {
    /// Opaque token string (UUID v4 text).
    pub token: String,
    /// Owning user.
    pub user_id: i64,
    /// Instant after which the token no longer authenticates.
    pub expire_at: DateTime<Utc>,
}

impl AuthToken {
    /// Check whether the token is still live at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at > now
    }
}

/// A live token joined with the identity it belongs to.
///
/// Used to pre-warm the in-process token cache at startup.
#[derive(Debug, Clone, FromRow)]
pub struct TokenOwner {
    pub token: String,
    #[sqlx(flatten)]
    pub user: User,
}
