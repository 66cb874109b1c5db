//! Access Log
//! Mission: One structured line per API request, with latency
//!
//! `/health` is exempt so load-balancer probes do not flood the log.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs method, path, status class, and elapsed time for every request.
///
/// Server errors get a WARN line; rejected requests (4xx) and successes
/// stay at INFO but carry distinct messages so they can be filtered apart.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path == "/health" {
        return next.run(request).await;
    }

    let started = Instant::now();
    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "request errored");
    } else if status.is_client_error() {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "request rejected");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "request served");
    }

    response
}
