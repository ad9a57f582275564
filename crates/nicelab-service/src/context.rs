//! Request context carrying the authenticated identity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use nicelab_core::error::AppError;
use nicelab_entity::{LabSession, User};

/// The identity acting on the current request.
///
/// Built by the HTTP layer once the token has been resolved and passed to
/// every service call.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub user: User,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user: User) -> Self {
        Self {
            user,
            request_time: Utc::now(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn is_professor(&self) -> bool {
        self.user.is_professor()
    }

    /// Fail unless the caller holds the elevated role.
    pub fn require_professor(&self) -> Result<(), AppError> {
        if self.is_professor() {
            Ok(())
        } else {
            Err(AppError::authorization("Professor role required"))
        }
    }

    /// Owners and professors may read a session.
    pub fn can_access(&self, session: &LabSession) -> bool {
        self.is_professor() || session.is_owned_by(self.user.id)
    }
}
