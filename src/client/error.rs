use std::time::Duration;

use thiserror::Error;

use super::transport::TransportError;
use crate::error::{AppError, ErrorKind};

/// Failure of a single `ServiceClient` call.
///
/// Every variant names the peer it concerns so failures can be traced
/// back to their origin.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The peer answered with a non-2xx status. Displays as the peer's own
    /// message.
    #[error("{message}")]
    Remote {
        service: String,
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("{service} request failed: {source}")]
    Transport {
        service: String,
        #[source]
        source: TransportError,
    },

    #[error("{service} request timed out after {}ms", .timeout.as_millis())]
    Timeout { service: String, timeout: Duration },

    /// The peer answered 2xx but the body is not an envelope.
    #[error("{service} returned an invalid response: {reason}")]
    Protocol { service: String, reason: String },

    #[error("{service} request cancelled")]
    Cancelled { service: String },

    /// The request was rejected before reaching the network.
    #[error("invalid request to {service}: {reason}")]
    InvalidRequest { service: String, reason: String },
}

impl ClientError {
    pub fn service(&self) -> &str {
        match self {
            ClientError::Remote { service, .. }
            | ClientError::Transport { service, .. }
            | ClientError::Timeout { service, .. }
            | ClientError::Protocol { service, .. }
            | ClientError::Cancelled { service }
            | ClientError::InvalidRequest { service, .. } => service,
        }
    }

    /// HTTP status returned by the peer, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same idempotent request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport { .. } | ClientError::Timeout { .. } => true,
            ClientError::Remote { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

/// Re-surfaces a peer failure as a local error.
///
/// A remote status that matches an operational kind keeps that kind and the
/// peer's message; everything else is an internal failure of this service.
impl From<ClientError> for AppError {
    fn from(error: ClientError) -> Self {
        let kind = match &error {
            ClientError::Remote { status, .. } => ErrorKind::from_status(*status),
            ClientError::InvalidRequest { .. } => Some(ErrorKind::Validation),
            _ => None,
        };
        match (kind, error) {
            (Some(kind), ClientError::Remote { message, .. }) => {
                AppError::new(kind).with_message(message)
            }
            (Some(kind), ClientError::InvalidRequest { reason, .. }) => {
                AppError::new(kind).with_message(reason)
            }
            (_, other) => AppError::Internal {
                source: anyhow::Error::new(other),
            },
        }
    }
}
