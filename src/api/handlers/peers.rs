//! Peer relay endpoint.
//!
//! `GET /api/peers/{service}/{*path}` calls `GET {peer base}/{path}` on the
//! named peer with the caller's own token. A success envelope is passed
//! through untouched; a failure comes back as the `AppError` re-derived
//! from the peer's status, so a 404 from the peer is a 404 here too.
//!
//! The wildcard arrives percent-decoded, so every segment is encoded again
//! before it reaches the peer URL, and `.`/`..` segments are refused.

use axum::{
    Router,
    extract::{Path, RawQuery, State, rejection::PathRejection},
    routing::get,
};

use crate::api::envelope::ApiResponse;
use crate::auth::AuthContext;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires `auth_middleware` on the enclosing router.
pub fn peer_routes() -> Router<AppState> {
    Router::new().route("/peers/{service}/{*path}", get(relay_get))
}

async fn relay_get(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<(String, String)>, PathRejection>,
    RawQuery(query): RawQuery,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let Path((service, path)) = path?;
    let client = state.peers.client(&service)?;

    let path = encode_peer_path(&path)?;
    let target = match query {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let envelope = client.get(&target, auth.caller()).await?;
    Ok(envelope)
}

/// Percent-encodes each decoded segment of `path` and returns it with a
/// leading `/`.
fn encode_peer_path(path: &str) -> AppResult<String> {
    if path.split('/').any(|segment| matches!(segment, "." | "..")) {
        return Err(AppError::validation()
            .with_message("Relay path must not contain '.' or '..' segments"));
    }

    let mut url = reqwest::Url::parse("http://peer.invalid/")
        .map_err(|e| anyhow::anyhow!("relay URL scratch base: {}", e))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("relay URL scratch base cannot hold a path"))?
        .clear()
        .extend(path.split('/'));

    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_unchanged() {
        assert_eq!(encode_peer_path("courses/123").unwrap(), "/courses/123");
    }

    #[test]
    fn test_decoded_delimiters_are_encoded_again() {
        assert_eq!(
            encode_peer_path("courses/a?admin=1#x").unwrap(),
            "/courses/a%3Fadmin=1%23x"
        );
        assert_eq!(encode_peer_path("notes/50%").unwrap(), "/notes/50%25");
    }

    #[test]
    fn test_dot_segments_are_refused() {
        for path in ["courses/../../internal", "../admin", "courses/./1"] {
            let error = encode_peer_path(path).unwrap_err();
            assert_eq!(error.status_code(), axum::http::StatusCode::BAD_REQUEST, "{path}");
        }
    }
}
