use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::identity::UserPayload;
use crate::error::{AppError, AppResult, messages};

/// JWT Claims structure: the propagated identity plus token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(flatten)]
    pub user: UserPayload,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid for `expiration_hours` from now.
    pub fn new(user: UserPayload, expiration_hours: i64) -> Self {
        let now = jiff::Timestamp::now().as_second();
        Self {
            user,
            iat: now,
            exp: now + expiration_hours * 3600,
        }
    }
}

/// Signs a token for `user`.
///
/// Used by the `token` CLI command and by tests; the services themselves
/// only ever verify tokens.
pub fn issue_token(user: UserPayload, secret: &str, expiration_hours: i64) -> AppResult<String> {
    let claims = Claims::new(user, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates and decodes a JWT token
///
/// Every service re-verifies the forwarded token itself; no upstream hop is
/// trusted.
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::authentication().with_message(messages::TOKEN_EXPIRED)
        }
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AppError::authentication().with_message("Invalid token signature")
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AppError::authentication().with_message(messages::INVALID_TOKEN)
        }
        _ => AppError::authentication().with_message(format!("Token validation failed: {}", e)),
    })
}
