//! JWT authentication middleware.
//!
//! Verifies the inbound bearer token and stores the resulting
//! `AuthContext` (identity plus the token itself, for forwarding) in the
//! request extensions.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthContext, BearerToken, verify_token};
use crate::error::{AppError, AppResult, messages};
use crate::state::AppState;

/// JWT authentication middleware
///
/// # Headers
/// Expects: `Authorization: Bearer <token>`
///
/// # Errors
/// Responds with an `Authentication` envelope (401) if the header is
/// missing or malformed, or the token fails verification.
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = verify_token(token.as_str(), &state.jwt_config.secret)?;

    request
        .extensions_mut()
        .insert(AuthContext::new(claims.user, token));

    Ok(next.run(request).await)
}

/// Extracts the raw token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> AppResult<BearerToken> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::authentication().with_message(messages::MISSING_AUTHORIZATION_HEADER))?
        .to_str()
        .map_err(|_| AppError::authentication().with_message(messages::INVALID_AUTHORIZATION_HEADER))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(BearerToken::new)
        .ok_or_else(|| AppError::authentication().with_message(messages::INVALID_AUTHORIZATION_HEADER))
}
