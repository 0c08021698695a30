//! The response envelope every endpoint produces and every peer client
//! consumes.
//!
//! ```json
//! { "success": true,  "data": { ... }, "message": "optional summary" }
//! { "success": false, "error": { "message": "...", "code": "...", "statusCode": 404 } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, ErrorKind};

/// Error block of a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status_code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the status code. Statuses outside 400..=599 are not error
    /// statuses and leave the field unset.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = is_error_status(status.as_u16()).then_some(status.as_u16());
        self
    }

    /// Whether the detail honours the wire contract.
    pub fn is_well_formed(&self) -> bool {
        self.status_code.is_none_or(is_error_status)
    }
}

impl From<&AppError> for ErrorDetail {
    fn from(error: &AppError) -> Self {
        let kind: ErrorKind = error.kind();
        ErrorDetail::new(error.public_message())
            .with_code(kind.code())
            .with_status(kind.status_code())
    }
}

fn is_error_status(status: u16) -> bool {
    (400..=599).contains(&status)
}

/// Uniform response body.
///
/// Fields are private so that `success` can only be `true` together with
/// `data` and only be `false` together with `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(
        default = "Option::default",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorDetail>,
}

/// A `data` key that is present is `Some`, even when its value is `null`,
/// so unit payloads survive a round trip. Only a missing key is `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn failure(error: ErrorDetail) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error),
        }
    }

    /// Attaches a human-readable summary; valid on either outcome.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }

    /// The most specific failure message the envelope carries: the error
    /// block's message first, then the summary.
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .map(|e| e.message.as_str())
            .or(self.message.as_deref())
    }

    /// Checks the outcome invariant.
    ///
    /// Envelopes built through this type always pass; the check exists for
    /// envelopes received from peers.
    pub fn is_consistent(&self) -> bool {
        let outcome = if self.success {
            self.data.is_some() && self.error.is_none()
        } else {
            self.error.is_some()
        };
        outcome && self.error.as_ref().is_none_or(ErrorDetail::is_well_formed)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = match &self.error {
            Some(detail) => detail
                .status_code
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            None => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

/// A success envelope sent with `201 Created`.
pub struct Created<T>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
