use tokio_util::sync::CancellationToken;

use crate::auth::BearerToken;

/// On whose behalf an outbound call is made.
///
/// Every `ServiceClient` operation requires one, and the only way to build
/// one is from a bearer token. Inside an authenticated handler it comes
/// from `AuthContext::caller()`, which forwards the inbound token verbatim.
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    token: &'a BearerToken,
    request_id: Option<&'a str>,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> Caller<'a> {
    /// Forwards `token` as the `Authorization: Bearer` credential.
    pub fn forwarding(token: &'a BearerToken) -> Self {
        Self {
            token,
            request_id: None,
            cancellation: None,
        }
    }

    /// Propagates the inbound request id as `X-Request-ID`.
    pub fn with_request_id(mut self, request_id: &'a str) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Aborts the call when `token` is cancelled.
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn token(&self) -> &'a BearerToken {
        self.token
    }

    pub fn request_id(&self) -> Option<&'a str> {
        self.request_id
    }

    pub fn cancellation(&self) -> Option<&'a CancellationToken> {
        self.cancellation
    }
}
