//! Default error messages shared by every service.
//!
//! Keeping the wording in one table means a peer three hops away sees the
//! same text the originating service would have produced.

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";
pub const RESOURCE_EXISTS: &str = "Resource already exists";
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INTERNAL_ERROR: &str = "Internal server error";

pub const MISSING_AUTHORIZATION_HEADER: &str = "Missing authorization header";
pub const INVALID_AUTHORIZATION_HEADER: &str =
    "Invalid authorization header format. Expected: Bearer <token>";
pub const TOKEN_EXPIRED: &str = "Token has expired";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const ROUTE_NOT_FOUND: &str = "The requested route was not found";
