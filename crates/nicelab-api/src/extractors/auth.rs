//! `AuthUser` extractor: resolves the session-token header through the
//! authentication gate and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use nicelab_core::error::AppError;
use nicelab_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(state.config.auth.token_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Missing session token"))?;

        let user = state.gate.resolve(token).await?;
        Ok(AuthUser(RequestContext::new(user)))
    }
}
