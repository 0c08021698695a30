//! SchoolHub Link
//!
//! The inter-service communication contract shared by every SchoolHub
//! service: the `ApiResponse` envelope, the `AppError` taxonomy with its
//! boundary handler, the typed per-peer `ServiceClient`, and bearer-token
//! forwarding through `AuthContext` and `Caller`.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod server;
pub mod state;

pub use api::envelope::{ApiResponse, ErrorDetail};
pub use error::{AppError, AppResult, ErrorKind};
pub use state::AppState;
