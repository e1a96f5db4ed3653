//! OPSI client entry points.
//!
//! [`OpsiClient`] owns one [`OpsiHttpClient`] and hands out the typed
//! interfaces that share it. [`PackageUploader`] is the separate WebDAV
//! channel for staging package files.
//!
//! # Example
//!
//! ```rust,ignore
//! use opsiclient::OpsiClient;
//!
//! let client = OpsiClient::new("https://opsi.example.org:4447/rpc", "admin", "secret", false)?;
//! let info = client.backend().info().await?;
//! ```

mod transport;
mod upload;

pub use transport::{OpsiHttpClient, DEFAULT_TIMEOUT};
pub use upload::{PackageUploader, DEFAULT_UPLOAD_TIMEOUT};

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::Host;
use crate::rpc::{
    BackendInterface, DepotInterface, HostInterface, ProductsInterface, ProductsOnClientInterface,
};

/// Options for connecting to an OPSI server.
#[derive(Clone)]
pub struct ClientOptions {
    /// RPC endpoint, e.g. `https://opsi.example.org:4447/rpc`
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Accept any TLS certificate (self-signed deployments)
    pub accept_invalid_certs: bool,
    /// Default per-call deadline
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            accept_invalid_certs: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Client for one OPSI server.
#[derive(Debug, Clone)]
pub struct OpsiClient {
    transport: Arc<OpsiHttpClient>,
}

impl OpsiClient {
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        Self::with_options(
            ClientOptions::new(endpoint, username, password)
                .accept_invalid_certs(accept_invalid_certs),
        )
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(OpsiHttpClient::with_options(&options)?),
        })
    }

    /// The shared transport, for calls no interface covers.
    pub fn transport(&self) -> &Arc<OpsiHttpClient> {
        &self.transport
    }

    pub fn backend(&self) -> BackendInterface {
        BackendInterface::new(self.transport.clone())
    }

    pub fn hosts(&self) -> HostInterface {
        HostInterface::new(self.transport.clone())
    }

    pub fn products(&self) -> ProductsInterface {
        ProductsInterface::new(self.transport.clone())
    }

    pub fn depot(&self) -> DepotInterface {
        DepotInterface::new(self.transport.clone())
    }

    /// Product-on-client interface bound to a client id.
    pub fn products_on_client(
        &self,
        client_id: impl Into<String>,
    ) -> Result<ProductsOnClientInterface> {
        ProductsOnClientInterface::new(self.transport.clone(), client_id)
    }

    /// Product-on-client interface bound to a host record.
    pub fn products_on_host(&self, host: &Host) -> Result<ProductsOnClientInterface> {
        ProductsOnClientInterface::for_host(self.transport.clone(), host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_options_default_timeout() {
        let opts = ClientOptions::new("https://opsi:4447/rpc", "admin", "pw");
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert!(!opts.accept_invalid_certs);
    }

    #[test]
    fn test_client_options_debug_hides_password() {
        let opts = ClientOptions::new("https://opsi:4447/rpc", "admin", "hunter2");
        assert!(!format!("{:?}", opts).contains("hunter2"));
    }

    #[test]
    fn test_products_on_client_requires_id() {
        let client = OpsiClient::new("https://opsi:4447/rpc", "admin", "pw", false).unwrap();
        assert!(client.products_on_client("").is_err());
        assert_eq!(
            client
                .products_on_host(&Host::new("pc1.example.org"))
                .unwrap()
                .client_id(),
            "pc1.example.org"
        );
    }
}
