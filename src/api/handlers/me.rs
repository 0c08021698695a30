//! Current user (me) endpoint.

use axum::{Router, routing::get};

use crate::api::envelope::ApiResponse;
use crate::auth::{AuthContext, UserPayload};
use crate::state::AppState;

/// Requires `auth_middleware` on the enclosing router.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// GET /api/me - identity carried by the caller's token
async fn get_me(auth: AuthContext) -> ApiResponse<UserPayload> {
    ApiResponse::ok(auth.user)
}
