//! Session handlers.

use axum::Json;
use axum::extract::{Path, State};

use nicelab_entity::{LabSession, SessionCredentials};

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /sessions (professors only)
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LabSession>>, ApiError> {
    Ok(Json(state.reservations.list_sessions(&auth).await?))
}

/// GET /sessions/{id}
pub async fn session_credentials(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionCredentials>, ApiError> {
    Ok(Json(
        state
            .reservations
            .session_credentials(&auth, session_id)
            .await?,
    ))
}
