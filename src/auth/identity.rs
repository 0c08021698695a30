//! The caller identity that travels with a request across service hops.

use std::fmt;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::middleware::RequestId;
use crate::client::Caller;
use crate::error::{AppError, AppResult};

/// Platform roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!(
                "Invalid role '{}'. Valid roles are: admin, teacher, student",
                other
            )),
        }
    }
}

/// Identity token contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub full_name: String,
}

/// The raw bearer credential exactly as the caller presented it.
///
/// `Debug` is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value carrying this token.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Verified identity of the inbound request.
///
/// Inserted into request extensions by `auth_middleware`; handlers take it
/// as an extractor and hand `caller()` to every peer call so the original
/// token is forwarded unchanged.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserPayload,
    pub token: BearerToken,
    pub request_id: Option<String>,
    pub cancellation: Option<CancellationToken>,
}

impl AuthContext {
    pub fn new(user: UserPayload, token: BearerToken) -> Self {
        Self {
            user,
            token,
            request_id: None,
            cancellation: None,
        }
    }

    /// The caller to pass to outbound `ServiceClient` calls.
    pub fn caller(&self) -> Caller<'_> {
        let caller = Caller::forwarding(&self.token);
        let caller = match &self.request_id {
            Some(id) => caller.with_request_id(id),
            None => caller,
        };
        match &self.cancellation {
            Some(token) => caller.with_cancellation(token),
            None => caller,
        }
    }

    /// Fails with an authorization error unless the caller holds one of
    /// `roles`.
    pub fn require_role(&self, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(AppError::authorization().with_message(format!(
                "Role '{}' is not allowed to perform this action",
                self.user.role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut context = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(AppError::authentication)?;

        if context.request_id.is_none() {
            context.request_id = parts.extensions.get::<RequestId>().map(|id| id.0.clone());
        }
        if context.cancellation.is_none() {
            context.cancellation = parts.extensions.get::<CancellationToken>().cloned();
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext::new(
            UserPayload {
                user_id: "u-1".to_string(),
                email: "kim@school.test".to_string(),
                role,
                full_name: "Kim Park".to_string(),
            },
            BearerToken::new("tok1"),
        )
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(token.header_value(), "Bearer super-secret");
    }

    #[test]
    fn test_require_role() {
        assert!(context(Role::Admin).require_role(&[Role::Admin, Role::Teacher]).is_ok());

        let error = context(Role::Student)
            .require_role(&[Role::Teacher])
            .unwrap_err();
        assert_eq!(error.status_code(), axum::http::StatusCode::FORBIDDEN);
        assert!(error.public_message().contains("student"));
    }

    #[test]
    fn test_caller_forwards_inbound_token() {
        let mut ctx = context(Role::Teacher);
        ctx.request_id = Some("req-9".to_string());
        let caller = ctx.caller();
        assert_eq!(caller.token().as_str(), "tok1");
        assert_eq!(caller.request_id(), Some("req-9"));
    }

    #[tokio::test]
    async fn test_extractor_without_context_is_authentication_error() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let error = AuthContext::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(error.public_message(), "Authentication required");
    }

    #[tokio::test]
    async fn test_extractor_picks_up_request_scope() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(context(Role::Teacher));
        parts.extensions.insert(RequestId("req-1".to_string()));
        parts.extensions.insert(CancellationToken::new());

        let ctx = AuthContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.request_id.as_deref(), Some("req-1"));
        assert!(ctx.cancellation.is_some());
    }
}
