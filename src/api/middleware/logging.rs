//! Request/response logging.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{Instrument, info, info_span, warn};

use super::RequestId;

/// Logs each request and its outcome inside an `http_request` span.
///
/// Peer calls made by the handler run inside the same span, so their log
/// lines carry the inbound method, uri and request id.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        request_id = %request_id
    );

    async move {
        info!(path = %uri.path(), "Request received");

        let start = Instant::now();
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis();
        let status = response.status().as_u16();

        if response.status().is_server_error() {
            warn!(status, duration_ms = %duration_ms, "Response sent");
        } else {
            info!(status, duration_ms = %duration_ms, "Response sent");
        }

        response
    }
    .instrument(span)
    .await
}
