//! HTTP transport for OPSI RPC calls.
//!
//! Each call is a plain HTTP POST of the request's wire form to the RPC
//! endpoint. OPSI reports application errors inside a 200 response, so the
//! envelope is always inspected before the payload is returned.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ClientOptions;
use crate::error::{OpsiError, Result};
use crate::types::{Request, RequestBuilder, ResponseEnvelope};

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection to one OPSI RPC endpoint.
///
/// Holds the HTTP client (with its cookie jar), the credentials and the
/// request id counter. Ids start at 1 and are unique per instance.
pub struct OpsiHttpClient {
    endpoint: Url,
    client: Client,
    username: String,
    password: String,
    timeout: Duration,
    request_id: AtomicU64,
}

impl OpsiHttpClient {
    /// Create a transport for the given endpoint and credentials.
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let mut options = ClientOptions::new(endpoint, username, password);
        options.accept_invalid_certs = accept_invalid_certs;
        Self::with_options(&options)
    }

    /// Create a transport from options.
    pub fn with_options(options: &ClientOptions) -> Result<Self> {
        if options.endpoint.trim().is_empty() {
            return Err(OpsiError::invalid_argument("RPC endpoint must not be empty"));
        }
        if options.username.is_empty() {
            return Err(OpsiError::invalid_argument("username must not be empty"));
        }

        let endpoint = Url::parse(options.endpoint.trim()).map_err(|e| {
            OpsiError::InvalidArgument(format!("invalid RPC endpoint '{}': {}", options.endpoint, e))
        })?;

        if options.accept_invalid_certs {
            tracing::warn!(endpoint = %endpoint, "TLS certificate validation disabled");
        }

        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self {
            endpoint,
            client,
            username: options.username.clone(),
            password: options.password.clone(),
            timeout: options.timeout,
            request_id: AtomicU64::new(1),
        })
    }

    /// The RPC endpoint this transport posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Default per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Finish a builder with the next request id.
    pub fn prepare(&self, builder: RequestBuilder) -> Result<Request> {
        builder.build(self.next_id())
    }

    /// Build and execute a request with the default deadline.
    pub async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.call_with_timeout(builder, self.timeout).await
    }

    /// Build and execute a request with an explicit deadline.
    pub async fn call_with_timeout<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<T> {
        let request = self.prepare(builder)?;
        self.execute_with_timeout(&request, timeout).await
    }

    /// Execute a request with the default deadline.
    pub async fn execute<T: DeserializeOwned>(&self, request: &Request) -> Result<T> {
        self.execute_with_timeout(request, self.timeout).await
    }

    /// Execute a request, failing with [`OpsiError::Timeout`] if the whole
    /// exchange takes longer than `timeout`.
    ///
    /// A `null` or missing result decodes into `T` as JSON `null`, which
    /// suits `()`, `Option<_>` and `Value`.
    #[tracing::instrument(
        skip(self, request),
        fields(rpc.method = %request.method(), rpc.id = request.id())
    )]
    pub async fn execute_with_timeout<T: DeserializeOwned>(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> Result<T> {
        let body = match tokio::time::timeout(timeout, self.send(request)).await {
            Ok(body) => body?,
            Err(_) => {
                tracing::warn!(?timeout, "RPC call timed out");
                return Err(OpsiError::Timeout {
                    method: request.method().to_string(),
                    timeout,
                });
            }
        };

        let envelope: ResponseEnvelope<Value> = serde_json::from_str(&body)
            .map_err(|e| OpsiError::Protocol(format!("Invalid response envelope: {}", e)))?;

        if let Some(id) = envelope.id {
            if id != request.id() {
                tracing::debug!(expected = request.id(), got = id, "response id mismatch");
            }
        }

        let data = envelope.into_data()?.unwrap_or(Value::Null);

        serde_json::from_value(data).map_err(|e| {
            OpsiError::Protocol(format!(
                "Failed to decode result of {}: {}",
                request.method(),
                e
            ))
        })
    }

    /// POST the request and return the raw body of a successful response.
    async fn send(&self, request: &Request) -> Result<String> {
        let wire = request.to_wire();
        tracing::debug!(request = %wire, "RPC request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
            .json(&wire)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), body = %body, "RPC response");

        if !status.is_success() {
            return Err(OpsiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

impl std::fmt::Debug for OpsiHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpsiHttpClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
