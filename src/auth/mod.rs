//! Caller identity: JWT verification and the context that forwards the
//! inbound bearer token to peer services.

mod identity;
pub mod jwt;

pub use identity::{AuthContext, BearerToken, Role, UserPayload};
pub use jwt::{Claims, issue_token, verify_token};
