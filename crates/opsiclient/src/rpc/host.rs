use std::sync::Arc;

use super::{ObjectInterface, RpcInterface};
use crate::client::OpsiHttpClient;
use crate::error::Result;
use crate::models::host::OPSI_CLIENT_TYPE;
use crate::models::Host;
use crate::types::RequestFilter;

/// Hosts known to the server.
#[derive(Debug, Clone)]
pub struct HostInterface {
    transport: Arc<OpsiHttpClient>,
}

impl RpcInterface for HostInterface {
    const INTERFACE_NAME: &'static str = "host";

    fn transport(&self) -> &OpsiHttpClient {
        &self.transport
    }
}

impl ObjectInterface for HostInterface {
    type Object = Host;
}

impl HostInterface {
    pub fn new(transport: Arc<OpsiHttpClient>) -> Self {
        Self { transport }
    }

    /// All registered clients.
    #[tracing::instrument(skip(self))]
    pub async fn get_clients(&self) -> Result<Vec<Host>> {
        self.get_all_filtered(RequestFilter::with("type", OPSI_CLIENT_TYPE))
            .await
    }

    /// A single host by id.
    pub async fn get(&self, host_id: &str) -> Result<Host> {
        self.get_filtered(RequestFilter::with("id", host_id)).await
    }

    pub async fn exists(&self, host_id: &str) -> Result<bool> {
        self.exists_filtered(RequestFilter::with("id", host_id)).await
    }
}
