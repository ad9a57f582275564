//! User directory.

use std::sync::Arc;

use nicelab_core::result::AppResult;
use nicelab_database::UserStore;
use nicelab_entity::User;

use crate::context::RequestContext;

/// Read access to registered users.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// List every user. Professors only.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        ctx.require_professor()?;
        self.users.list().await
    }
}
