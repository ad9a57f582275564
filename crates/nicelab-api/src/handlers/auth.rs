//! Auth handlers.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::Json;
use nicelab_core::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::LoginResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    // A form missing either field is a failed login, not a 422.
    let Form(req) = form.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable login form");
        AppError::authentication("Invalid email or password")
    })?;

    let result = state.login.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        user: result.user,
        token: result.token,
    }))
}
