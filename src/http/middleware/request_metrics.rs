//! Per-route request accounting.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

/// Count responses by matched route and status.
///
/// Installed with `route_layer`, so only matched routes are counted.
pub async fn request_metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(route = %route, status = %status, "Request failed");
    }
    metrics::record_request(route, status.as_u16());
    response
}
