//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a lab user can hold.
///
/// Professors hold the elevated role: they may list users and sessions and
/// read any session's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A learner reserving labs for themselves.
    Student,
    /// An operator with visibility over every user and session.
    Professor,
}

impl UserRole {
    /// Whether this role carries elevated privileges.
    pub fn is_professor(&self) -> bool {
        matches!(self, Self::Professor)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professor => "professor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = nicelab_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "professor" => Ok(Self::Professor),
            _ => Err(nicelab_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: student, professor"
            ))),
        }
    }
}
