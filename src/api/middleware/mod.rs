//! Middleware components for request processing.
//!
//! Layer order (outermost first): request id, logging, cancellation, and
//! JWT auth on the protected routes. The error boundary is not a layer:
//! every `AppError` returned by a handler or extractor is rendered by its
//! `IntoResponse` impl.

mod auth;
mod cancellation;
mod error_handler;
mod logging;
mod request_id;

pub use auth::auth_middleware;
pub use cancellation::request_cancellation_middleware;
pub use error_handler::{
    ErrorBoundary, handle_json_rejection, handle_path_rejection, handle_query_rejection,
    route_not_found,
};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
