//! Inter-service client.
//!
//! A `ServiceClient` calls exactly one peer, forwards the caller's bearer
//! token, decodes the peer's `ApiResponse` envelope and collapses any
//! non-success answer into a single `ClientError`. The network itself sits
//! behind the `Transport` trait.

mod caller;
mod error;
mod registry;
mod retry;
mod service_client;
pub mod transport;


pub use caller::Caller;
pub use error::ClientError;
pub use registry::PeerRegistry;
pub use retry::{RetryPolicy, is_idempotent};
pub use service_client::{DEFAULT_TIMEOUT, NoBody, ServiceClient};
pub use transport::{
    OutboundRequest, ReqwestTransport, Transport, TransportError, TransportOptions,
    TransportResponse,
};
