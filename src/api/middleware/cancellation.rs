//! Per-request cancellation.

use axum::{extract::Request, middleware::Next, response::Response};
use tokio_util::sync::CancellationToken;

/// Inserts a `CancellationToken` that is cancelled once the request is
/// finished or abandoned.
///
/// When the client disconnects, hyper drops the request future and with it
/// the drop guard, so any peer call still waiting on `Caller::cancellation`
/// (including ones spawned onto other tasks) stops with
/// `ClientError::Cancelled`.
pub async fn request_cancellation_middleware(mut request: Request, next: Next) -> Response {
    let token = CancellationToken::new();
    request.extensions_mut().insert(token.clone());

    let _guard = token.drop_guard();
    next.run(request).await
}
