//! Typed client for calling one peer service.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use validator::{Validate, ValidationErrors};

use super::caller::Caller;
use super::error::ClientError;
use super::retry::{RetryPolicy, is_idempotent};
use super::transport::{OutboundRequest, Transport, TransportResponse};
use crate::api::envelope::ApiResponse;
use crate::api::middleware::REQUEST_ID_HEADER;

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder body type for `post`/`put` calls that send no body:
/// `client.post::<Ack, NoBody>("/x", None, caller)`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoBody;

impl Validate for NoBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Client bound to one peer's base URL.
///
/// Holds configuration only; cloning is cheap and a single instance can be
/// shared by every concurrent request.
///
/// # Example
/// ```ignore
/// let course: ApiResponse<Course> = client.get("/courses/123", auth.caller()).await?;
/// ```
#[derive(Clone)]
pub struct ServiceClient {
    service_name: Arc<str>,
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service_name", &self.service_name)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Creates a client for `service_name` at `base_url`.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidRequest` if `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(
        service_name: impl Into<String>,
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let service_name = service_name.into();
        let base_url = base_url.into();

        let parsed = reqwest::Url::parse(&base_url).map_err(|e| ClientError::InvalidRequest {
            service: service_name.clone(),
            reason: format!("invalid base URL '{}': {}", base_url, e),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidRequest {
                service: service_name,
                reason: format!("base URL '{}' must use http or https", base_url),
            });
        }

        Ok(Self {
            service_name: service_name.into(),
            base_url: base_url.trim_end_matches('/').into(),
            transport,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Absolute URL for `path`, with exactly one `/` after the base.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T>(&self, path: &str, caller: Caller<'_>) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(Method::GET, path, None, caller).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        caller: Caller<'_>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Validate,
    {
        let body = self.encode_body(&Method::POST, path, body)?;
        self.send(Method::POST, path, body, caller).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        caller: Caller<'_>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Validate,
    {
        let body = self.encode_body(&Method::PUT, path, body)?;
        self.send(Method::PUT, path, body, caller).await
    }

    pub async fn delete<T>(
        &self,
        path: &str,
        caller: Caller<'_>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(Method::DELETE, path, None, caller).await
    }

    /// Validates then serialises a body; nothing is sent when either fails.
    fn encode_body<B>(
        &self,
        method: &Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Vec<u8>>, ClientError>
    where
        B: Serialize + Validate,
    {
        let Some(body) = body else {
            return Ok(None);
        };

        let encoded = body
            .validate()
            .map_err(|e| self.invalid_request(format!("request body failed validation: {}", e)))
            .and_then(|()| {
                serde_json::to_vec(body).map_err(|e| {
                    self.invalid_request(format!("failed to serialize request body: {}", e))
                })
            });

        match encoded {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) => {
                self.log_failure(method, &self.url_for(path), &error);
                Err(error)
            }
        }
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        caller: Caller<'_>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        let result = match self.build_request(method.clone(), url.clone(), body, caller) {
            Ok(request) => self.execute(request, caller.cancellation()).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(envelope) => {
                tracing::debug!(
                    service = %self.service_name,
                    method = %method,
                    url = %url,
                    "Peer request succeeded"
                );
                Ok(envelope)
            }
            Err(error) => {
                self.log_failure(&method, &url, &error);
                Err(error)
            }
        }
    }

    /// Runs the attempt loop. Only idempotent methods are retried.
    async fn execute<T>(
        &self,
        request: OutboundRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        let retries_allowed = if is_idempotent(&request.method) {
            self.retry.max_retries
        } else {
            0
        };

        let mut attempt = 0;
        loop {
            let result = match self.attempt(request.clone(), cancellation).await {
                Ok(response) => self.interpret(response),
                Err(error) => Err(error),
            };

            match result {
                Err(error) if attempt < retries_allowed && error.is_retryable() => {
                    let delay = self.retry.backoff(attempt);
                    tracing::debug!(
                        service = %self.service_name,
                        attempt = attempt + 1,
                        delay_ms = %delay.as_millis(),
                        error = %error,
                        "Retrying peer request"
                    );
                    self.pause(delay, cancellation).await?;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One bounded exchange with the peer.
    async fn attempt(
        &self,
        request: OutboundRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<TransportResponse, ClientError> {
        let call = tokio::time::timeout(self.timeout, self.transport.execute(request));

        let outcome = match cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(self.cancelled()),
                outcome = call => outcome,
            },
            None => call.await,
        };

        match outcome {
            Err(_elapsed) => Err(ClientError::Timeout {
                service: self.service_name.to_string(),
                timeout: self.timeout,
            }),
            Ok(Err(source)) => Err(ClientError::Transport {
                service: self.service_name.to_string(),
                source,
            }),
            Ok(Ok(response)) => Ok(response),
        }
    }

    async fn pause(
        &self,
        delay: Duration,
        cancellation: Option<&CancellationToken>,
    ) -> Result<(), ClientError> {
        match cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(self.cancelled()),
                _ = tokio::time::sleep(delay) => Ok(()),
            },
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    /// Turns a raw response into an envelope or a collapsed remote error.
    fn interpret<T>(&self, response: TransportResponse) -> Result<ApiResponse<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        if !response.status.is_success() {
            // Any body shape is accepted here; only the message is kept.
            let envelope = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&response.body).ok();
            let message = envelope
                .as_ref()
                .and_then(|e| e.failure_message())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} request failed", self.service_name));
            let code = envelope.and_then(|e| e.error().and_then(|detail| detail.code.clone()));

            return Err(ClientError::Remote {
                service: self.service_name.to_string(),
                status: response.status.as_u16(),
                message,
                code,
            });
        }

        let envelope: ApiResponse<T> =
            serde_json::from_slice(&response.body).map_err(|e| ClientError::Protocol {
                service: self.service_name.to_string(),
                reason: format!("malformed envelope: {}", e),
            })?;

        if !envelope.is_consistent() {
            return Err(ClientError::Protocol {
                service: self.service_name.to_string(),
                reason: "envelope breaks the success/data/error contract".to_string(),
            });
        }

        Ok(envelope)
    }

    fn build_request(
        &self,
        method: Method,
        url: String,
        body: Option<Vec<u8>>,
        caller: Caller<'_>,
    ) -> Result<OutboundRequest, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let authorization = HeaderValue::from_str(&caller.token().header_value())
            .map_err(|_| self.invalid_request("bearer token is not a valid header value"))?;
        headers.insert(header::AUTHORIZATION, authorization);

        if let Some(request_id) = caller.request_id() {
            if let Ok(value) = HeaderValue::from_str(request_id) {
                headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
        }

        Ok(OutboundRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn invalid_request(&self, reason: impl Into<String>) -> ClientError {
        ClientError::InvalidRequest {
            service: self.service_name.to_string(),
            reason: reason.into(),
        }
    }

    fn cancelled(&self) -> ClientError {
        ClientError::Cancelled {
            service: self.service_name.to_string(),
        }
    }

    /// Emits the single diagnostic line for a failed call.
    fn log_failure(&self, method: &Method, url: &str, error: &ClientError) {
        match error {
            ClientError::Remote { status, .. } if *status < 500 => tracing::warn!(
                service = %self.service_name,
                method = %method,
                url = %url,
                status = %status,
                error = %error,
                "Peer request rejected"
            ),
            _ => tracing::error!(
                service = %self.service_name,
                method = %method,
                url = %url,
                status = ?error.status(),
                error = %error,
                "Peer request failed"
            ),
        }
    }
}
