//! Boundary error handler: the single place where an `AppError` becomes an
//! `ApiResponse`.
//!
//! Operational errors leave with their own message and status. Internal
//! errors are logged in full and masked behind the generic message, unless
//! the boundary runs in development mode, where the error chain is added as
//! the envelope's `message`.

use std::sync::OnceLock;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::api::envelope::{ApiResponse, ErrorDetail};
use crate::config::Environment;
use crate::error::{AppError, messages};

static ERROR_BOUNDARY: OnceLock<ErrorBoundary> = OnceLock::new();

/// How much internal detail the boundary reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorBoundary {
    expose_internal: bool,
}

impl ErrorBoundary {
    /// Masks internal detail.
    pub const fn production() -> Self {
        Self {
            expose_internal: false,
        }
    }

    /// Adds the internal error chain to the envelope.
    pub const fn development() -> Self {
        Self {
            expose_internal: true,
        }
    }

    /// Exposes internals only for an explicit development environment.
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_development() {
            Self::development()
        } else {
            Self::production()
        }
    }

    /// Installs the process-wide boundary. Only the first call wins; later
    /// calls return `false`.
    pub fn install(self) -> bool {
        ERROR_BOUNDARY.set(self).is_ok()
    }

    /// The installed boundary, or the masking one when none was installed.
    pub fn current() -> Self {
        ERROR_BOUNDARY.get().copied().unwrap_or_else(Self::production)
    }

    /// Renders an error into its status and envelope.
    ///
    /// Pure in the error: rendering the same error twice yields identical
    /// output.
    pub fn render(&self, error: &AppError) -> (StatusCode, ApiResponse<()>) {
        let envelope = ApiResponse::failure(ErrorDetail::from(error));
        let envelope = match error {
            AppError::Internal { source } if self.expose_internal => {
                envelope.with_message(format!("{source:#}"))
            }
            _ => envelope,
        };
        (error.status_code(), envelope)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Unhandled internal error");
            }
            operational => {
                tracing::warn!(
                    status = %operational.status_code().as_u16(),
                    message = %operational.public_message(),
                    "Request failed"
                );
            }
        }

        let (status, envelope) = ErrorBoundary::current().render(&self);
        (status, Json(envelope)).into_response()
    }
}

/// Converts axum JSON rejection errors to a validation envelope.
pub fn handle_json_rejection(rejection: JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON format: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(_) => "JSON syntax error".to_string(),
        JsonRejection::MissingJsonContentType(_) => {
            "Missing or invalid Content-Type header, expected application/json".to_string()
        }
        JsonRejection::BytesRejection(_) => "Request body too large".to_string(),
        _ => "Failed to parse JSON request".to_string(),
    };
    AppError::validation().with_message(message)
}

/// Converts axum path rejection errors to a validation envelope.
pub fn handle_path_rejection(rejection: PathRejection) -> AppError {
    let message = match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            format!("Invalid path parameters: {}", err.body_text())
        }
        PathRejection::MissingPathParams(_) => "Missing required path parameters".to_string(),
        _ => "Invalid path parameters".to_string(),
    };
    AppError::validation().with_message(message)
}

/// Converts axum query rejection errors to a validation envelope.
pub fn handle_query_rejection(rejection: QueryRejection) -> AppError {
    let message = match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            format!("Invalid query parameters: {}", err.body_text())
        }
        _ => "Invalid query parameters".to_string(),
    };
    AppError::validation().with_message(message)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        handle_json_rejection(rejection)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        handle_path_rejection(rejection)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        handle_query_rejection(rejection)
    }
}

/// Router fallback so unknown routes also answer with an envelope.
pub async fn route_not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "No route matched");
    AppError::not_found().with_message(messages::ROUTE_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    #[test]
    fn test_default_authentication_error_envelope() {
        let (status, envelope) = ErrorBoundary::production().render(&AppError::authentication());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "error": {
                    "message": "Authentication required",
                    "code": "AUTHENTICATION_ERROR",
                    "statusCode": 401
                }
            })
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let boundary = ErrorBoundary::production();
        let error = AppError::conflict().with_message("Email already registered");
        let first = serde_json::to_vec(&boundary.render(&error).1).unwrap();
        let second = serde_json::to_vec(&boundary.render(&error).1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_internal_error_masked_in_production() {
        let error = AppError::from(anyhow::anyhow!("connection string postgres://secret"));
        let (status, envelope) = ErrorBoundary::production().render(&error);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_string(&envelope).unwrap();
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("secret"));
    }

    #[test]
    fn test_internal_error_detailed_in_development() {
        let error = AppError::from(anyhow::anyhow!("root cause")).with_message("loading roster");
        let (_, envelope) = ErrorBoundary::development().render(&error);
        let message = envelope.message().unwrap();
        assert!(message.contains("loading roster"));
        assert!(message.contains("root cause"));
        assert_eq!(envelope.error().unwrap().message, "Internal server error");
    }

    #[test]
    fn test_operational_error_identical_in_both_modes() {
        let error = AppError::not_found().with_message("Course not found");
        assert_eq!(
            ErrorBoundary::production().render(&error).1,
            ErrorBoundary::development().render(&error).1
        );
    }

    #[test]
    fn test_boundary_for_environment() {
        assert_eq!(
            ErrorBoundary::for_environment(Environment::Development),
            ErrorBoundary::development()
        );
        assert_eq!(
            ErrorBoundary::for_environment(Environment::Production),
            ErrorBoundary::production()
        );
        assert_eq!(
            ErrorBoundary::for_environment(Environment::Staging),
            ErrorBoundary::production()
        );
    }

    #[test]
    fn test_unset_or_misspelled_environment_never_exposes_internals() {
        let error = AppError::from(anyhow::anyhow!("postgres://admin:hunter2@db"));

        let (_, envelope) = ErrorBoundary::for_environment(Environment::default()).render(&error);
        assert!(!serde_json::to_string(&envelope).unwrap().contains("hunter2"));

        assert!("prd".parse::<Environment>().is_err());
    }

    #[test]
    fn test_operational_error_logs_one_warning() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::{Layer, layer::Context, layer::SubscriberExt};

        struct WarnCounter(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for WarnCounter {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = AppError::conflict().into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_into_response_writes_envelope() {
        let response = AppError::validation()
            .with_message("title is required")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"]["message"], json!("title is required"));
        assert_eq!(value["error"]["statusCode"], json!(400));
    }

    #[test]
    fn test_json_rejection_becomes_validation_error() {
        use axum::extract::rejection::MissingJsonContentType;

        let error = handle_json_rejection(JsonRejection::MissingJsonContentType(
            MissingJsonContentType::default(),
        ));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.public_message().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_route_not_found_fallback() {
        let error = route_not_found(Uri::from_static("/api/nowhere")).await;
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.public_message(), messages::ROUTE_NOT_FOUND);
    }
}
