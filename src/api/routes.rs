//! Router configuration for the API.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;

use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, logging_middleware, request_cancellation_middleware, request_id_middleware,
    route_not_found,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Compression
/// 2. Request ID - generates or propagates `x-request-id`
/// 3. Logging - `http_request` span carrying the request ID
/// 4. Cancellation - per-request `CancellationToken`
/// 5. JWT auth, on the protected routes only
///
/// # Routes
/// - `GET /api/health` - public
/// - `GET /api/me` - authenticated
/// - `GET /api/peers/{service}/{*path}` - authenticated peer relay
///
/// Anything else answers with a `NotFound` envelope.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(handlers::me::me_routes())
        .merge(handlers::peers::peer_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = Router::new()
        .merge(handlers::health::health_routes())
        .merge(protected);

    Router::new()
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn(request_cancellation_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .with_state(state)
}
