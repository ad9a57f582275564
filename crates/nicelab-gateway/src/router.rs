//! Gateway routes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{HeaderName, Method};
use axum::response::Response;
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use nicelab_core::config::GatewayConfig;
use nicelab_core::error::{AppError, ErrorKind};
use nicelab_core::result::AppResult;

use crate::proxy::{Upstream, forward};

#[derive(Debug, Clone)]
struct GatewayState {
    client: reqwest::Client,
    auth: Arc<Upstream>,
    pipeline: Arc<Upstream>,
}

/// Build the gateway router from configuration.
pub fn build_gateway_router(config: &GatewayConfig) -> AppResult<Router> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;

    let state = GatewayState {
        client,
        auth: Arc::new(Upstream::new("/v1/auth", config.auth_url.clone())),
        pipeline: Arc::new(Upstream::new("/v1/pipeline", config.pipeline_url.clone())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("x-session-token"),
            HeaderName::from_static("content-type"),
        ]);

    Ok(Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/v1/auth/{*rest}", any(proxy_auth))
        .route("/v1/pipeline/{*rest}", any(proxy_pipeline))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

async fn proxy_auth(State(state): State<GatewayState>, request: Request) -> Response {
    forward(&state.client, &state.auth, request).await
}

async fn proxy_pipeline(State(state): State<GatewayState>, request: Request) -> Response {
    forward(&state.client, &state.pipeline, request).await
}
