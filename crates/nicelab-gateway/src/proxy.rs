//! Request forwarding.

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, warn};

/// Largest request body the gateway buffers before forwarding.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// One backend service behind a path prefix.
#[derive(Debug, Clone)]
pub struct Upstream {
    /// Public prefix, e.g. `/v1/auth`.
    pub prefix: &'static str,
    /// Base URL of the backend.
    pub base_url: String,
}

impl Upstream {
    pub fn new(prefix: &'static str, base_url: impl Into<String>) -> Self {
        Self {
            prefix,
            base_url: base_url.into(),
        }
    }

    /// Backend URL for a public path and optional query string.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let rest = path.strip_prefix(self.prefix).unwrap_or(path);
        let rest = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        };

        let mut url = format!("{}{}", self.base_url.trim_end_matches('/'), rest);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

#[derive(Debug, Serialize)]
struct GatewayErrorBody {
    error: &'static str,
    message: String,
}

fn gateway_error(status: StatusCode, error: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(GatewayErrorBody {
            error,
            message: message.into(),
        }),
    )
        .into_response()
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Forward `request` to `upstream` and relay the answer.
pub async fn forward(client: &reqwest::Client, upstream: &Upstream, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let url = upstream.target_url(parts.uri.path(), parts.uri.query());

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return gateway_error(StatusCode::BAD_REQUEST, "BAD_REQUEST", format!("Unreadable body: {e}"));
        }
    };

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    debug!(method = %parts.method, url = %url, "Forwarding request");

    let upstream_response = match client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(prefix = upstream.prefix, error = %e, "Upstream request failed");
            return gateway_error(StatusCode::BAD_GATEWAY, "BAD_GATEWAY", "Upstream service unavailable");
        }
    };

    let status = upstream_response.status();
    let mut response_headers = upstream_response.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    response_headers.remove(header::CONTENT_LENGTH);

    let bytes = match upstream_response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(prefix = upstream.prefix, error = %e, "Upstream body failed");
            return gateway_error(StatusCode::BAD_GATEWAY, "BAD_GATEWAY", "Upstream service unavailable");
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_strips_prefix_only_once() {
        let auth = Upstream::new("/v1/auth", "http://auth:8080/");
        assert_eq!(auth.target_url("/v1/auth/login", None), "http://auth:8080/login");
        assert_eq!(
            auth.target_url("/v1/auth/v1/auth/x", Some("a=1")),
            "http://auth:8080/v1/auth/x?a=1"
        );
        assert_eq!(auth.target_url("/v1/auth", None), "http://auth:8080/");
    }

    #[test]
    fn test_hop_by_hop_headers_removed() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", "close".parse().unwrap());
        headers.insert("x-session-token", "t".parse().unwrap());
        strip_hop_by_hop(&mut headers);
        assert!(headers.get("connection").is_none());
        assert!(headers.get("x-session-token").is_some());
    }
}
