//! Lab handlers.

use axum::Json;
use axum::extract::{Path, State};

use nicelab_entity::Lab;
use nicelab_service::Reservation;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /labs
pub async fn list_labs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Lab>>, ApiError> {
    Ok(Json(state.reservations.list_labs(&auth).await?))
}

/// POST /labs/{id}
///
/// Provisions the lab for the caller and records the session.
pub async fn reserve_lab(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lab_id): Path<i64>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(state.reservations.reserve(&auth, lab_id).await?))
}
