use std::sync::Arc;

use super::RpcInterface;
use crate::client::OpsiHttpClient;
use crate::error::Result;
use crate::models::BackendInfo;
use crate::types::Request;

/// General backend calls.
#[derive(Debug, Clone)]
pub struct BackendInterface {
    transport: Arc<OpsiHttpClient>,
}

impl RpcInterface for BackendInterface {
    const INTERFACE_NAME: &'static str = "backend";

    fn transport(&self) -> &OpsiHttpClient {
        &self.transport
    }
}

impl BackendInterface {
    pub fn new(transport: Arc<OpsiHttpClient>) -> Self {
        Self { transport }
    }

    /// Retrieve general information about the backend.
    #[tracing::instrument(skip(self))]
    pub async fn info(&self) -> Result<BackendInfo> {
        self.transport
            .call(Request::builder(self.full_method_name("info")))
            .await
    }
}
