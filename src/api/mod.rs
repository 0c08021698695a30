//! HTTP layer: the response envelope, middleware, handlers and router.

pub mod envelope;
pub mod handlers;
pub mod middleware;
pub mod routes;
