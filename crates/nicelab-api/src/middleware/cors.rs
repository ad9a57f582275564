//! CORS layer configuration.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};

use nicelab_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Entries that do not parse as the expected HTTP type are skipped.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin: AllowOrigin = if config.allows_any_origin() {
        Any.into()
    } else {
        parse_all::<HeaderValue>(&config.allowed_origins).into()
    };

    let headers: AllowHeaders = if config.allowed_headers.iter().any(|h| h == "*") {
        Any.into()
    } else {
        parse_all::<HeaderName>(&config.allowed_headers).into()
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(parse_all::<Method>(&config.allowed_methods))
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn parse_all<T: FromStr>(items: &[String]) -> Vec<T> {
    items.iter().filter_map(|item| item.parse().ok()).collect()
}
