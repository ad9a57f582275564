//! User directory handlers.

use axum::Json;
use axum::extract::State;

use nicelab_entity::User;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /users (professors only)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list(&auth).await?))
}
