//! Request DTOs.

use serde::Deserialize;

/// Login form body (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
