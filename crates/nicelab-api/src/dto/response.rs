//! Response DTOs.

use serde::Serialize;

use nicelab_entity::User;

/// Login response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: User,
    /// Opaque token to send in the session-token header.
    pub token: String,
}
