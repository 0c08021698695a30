use axum::http::StatusCode;
use thiserror::Error;

use super::messages;

/// The fixed set of failure classes that are meaningful across service
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    Conflict,
    NotFound,
    Validation,
    Internal,
}

impl ErrorKind {
    /// Every kind, operational ones first.
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Validation,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::Internal,
    ];

    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code carried in `error.code`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Authentication => messages::AUTHENTICATION_REQUIRED,
            ErrorKind::Authorization => messages::INSUFFICIENT_PERMISSIONS,
            ErrorKind::Conflict => messages::RESOURCE_EXISTS,
            ErrorKind::NotFound => messages::RESOURCE_NOT_FOUND,
            ErrorKind::Validation => messages::VALIDATION_FAILED,
            ErrorKind::Internal => messages::INTERNAL_ERROR,
        }
    }

    /// Operational kinds are anticipated business-rule violations whose
    /// message is safe to show to the caller.
    pub fn is_operational(self) -> bool {
        !matches!(self, ErrorKind::Internal)
    }

    /// Re-derives an operational kind from a status code received from a peer.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(ErrorKind::Validation),
            401 => Some(ErrorKind::Authentication),
            403 => Some(ErrorKind::Authorization),
            404 => Some(ErrorKind::NotFound),
            409 => Some(ErrorKind::Conflict),
            _ => None,
        }
    }
}

/// Application-wide error type.
///
/// Operational variants carry only a message; the status code is fixed by
/// the variant. `Internal` wraps an unexpected failure whose detail must not
/// reach the caller outside development.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    Authorization { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Validation { message: String },

    /// Internal error for unexpected failures
    #[error("Internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Builds an error of the given kind with the default message.
    ///
    /// `ErrorKind::Internal` has no caller-visible message, so its default
    /// text becomes the (masked) source.
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.default_message().to_string();
        match kind {
            ErrorKind::Authentication => AppError::Authentication { message },
            ErrorKind::Authorization => AppError::Authorization { message },
            ErrorKind::Conflict => AppError::Conflict { message },
            ErrorKind::NotFound => AppError::NotFound { message },
            ErrorKind::Validation => AppError::Validation { message },
            ErrorKind::Internal => AppError::Internal {
                source: anyhow::anyhow!(message),
            },
        }
    }

    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    pub fn authorization() -> Self {
        Self::new(ErrorKind::Authorization)
    }

    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Replaces the message of an operational error.
    ///
    /// On `Internal` the message is attached as context to the source and
    /// stays server-side.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            AppError::Authentication { .. } => AppError::Authentication { message },
            AppError::Authorization { .. } => AppError::Authorization { message },
            AppError::Conflict { .. } => AppError::Conflict { message },
            AppError::NotFound { .. } => AppError::NotFound { message },
            AppError::Validation { .. } => AppError::Validation { message },
            AppError::Internal { source } => AppError::Internal {
                source: source.context(message),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Authentication { .. } => ErrorKind::Authentication,
            AppError::Authorization { .. } => ErrorKind::Authorization,
            AppError::Conflict { .. } => ErrorKind::Conflict,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    pub fn is_operational(&self) -> bool {
        self.kind().is_operational()
    }

    /// The message that may be shown to a caller.
    ///
    /// For `Internal` this is always the generic message; use the `Display`
    /// implementation (or the error chain) for the server-side detail.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Authentication { message }
            | AppError::Authorization { message }
            | AppError::Conflict { message }
            | AppError::NotFound { message }
            | AppError::Validation { message } => message,
            AppError::Internal { .. } => ErrorKind::Internal.default_message(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::validation().with_message(errors.to_string())
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
