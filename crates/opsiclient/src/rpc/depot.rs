use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::RpcInterface;
use crate::client::OpsiHttpClient;
use crate::error::Result;
use crate::types::Request;

/// Deadline for package install and uninstall. The server only answers
/// once the operation has finished.
pub const PACKAGE_TIMEOUT: Duration = Duration::from_secs(180);

/// Depot operations: checksums and package (un)installation.
#[derive(Debug, Clone)]
pub struct DepotInterface {
    transport: Arc<OpsiHttpClient>,
}

impl RpcInterface for DepotInterface {
    const INTERFACE_NAME: &'static str = "depot";

    fn transport(&self) -> &OpsiHttpClient {
        &self.transport
    }
}

impl DepotInterface {
    pub fn new(transport: Arc<OpsiHttpClient>) -> Self {
        Self { transport }
    }

    /// MD5 sum of a file on the depot, e.g. below `/var/lib/opsi/repository`.
    #[tracing::instrument(skip(self))]
    pub async fn get_md5_sum(&self, absolute_file_path: &str) -> Result<String> {
        self.transport
            .call(Request::builder(self.full_method_name("getMD5Sum")).param(absolute_file_path))
            .await
    }

    /// Install an uploaded package file.
    pub async fn install_package(&self, absolute_file_path: &str) -> Result<()> {
        self.install_package_with_timeout(absolute_file_path, PACKAGE_TIMEOUT)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn install_package_with_timeout(
        &self,
        absolute_file_path: &str,
        timeout: Duration,
    ) -> Result<()> {
        let _: Value = self
            .transport
            .call_with_timeout(
                Request::builder(self.full_method_name("installPackage")).param(absolute_file_path),
                timeout,
            )
            .await?;
        tracing::info!(package = absolute_file_path, "package installed");
        Ok(())
    }

    /// Remove a product's package from the depot.
    pub async fn uninstall_package(&self, product_id: &str) -> Result<()> {
        self.uninstall_package_with_timeout(product_id, PACKAGE_TIMEOUT)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn uninstall_package_with_timeout(
        &self,
        product_id: &str,
        timeout: Duration,
    ) -> Result<()> {
        let _: Value = self
            .transport
            .call_with_timeout(
                Request::builder(self.full_method_name("uninstallPackage")).param(product_id),
                timeout,
            )
            .await?;
        tracing::info!(product = product_id, "package uninstalled");
        Ok(())
    }
}
