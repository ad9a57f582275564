//! Route definitions for the NiceLab HTTP API.
//!
//! Routes are split into the auth group and the pipeline group so each can
//! be served by its own process, or both by one.

use std::str::FromStr;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use nicelab_core::error::AppError;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Which route groups a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceScope {
    All,
    Auth,
    Pipeline,
}

impl FromStr for ServiceScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "auth" => Ok(Self::Auth),
            "pipeline" => Ok(Self::Pipeline),
            _ => Err(AppError::validation(format!(
                "Invalid service: '{s}'. Expected one of: all, auth, pipeline"
            ))),
        }
    }
}

/// Build the Axum router for `scope` with middleware and state applied.
pub fn build_router(state: AppState, scope: ServiceScope) -> Router {
    let mut routes = Router::new().merge(health_routes());
    if matches!(scope, ServiceScope::All | ServiceScope::Auth) {
        routes = routes.merge(auth_routes());
    }
    if matches!(scope, ServiceScope::All | ServiceScope::Pipeline) {
        routes = routes.merge(pipeline_routes());
    }

    let timeout = state.config.server.request_timeout();
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    routes
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Login and user directory.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/users", get(handlers::user::list_users))
}

/// Labs and sessions.
fn pipeline_routes() -> Router<AppState> {
    Router::new()
        .route("/labs", get(handlers::lab::list_labs))
        .route("/labs/{id}", post(handlers::lab::reserve_lab))
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/sessions/{id}", get(handlers::session::session_credentials))
}
