use std::sync::Arc;

use super::{ObjectInterface, RpcInterface};
use crate::client::OpsiHttpClient;
use crate::error::Result;
use crate::models::{Product, ProductType};
use crate::types::RequestFilter;

/// Products available on the server.
#[derive(Debug, Clone)]
pub struct ProductsInterface {
    transport: Arc<OpsiHttpClient>,
}

impl RpcInterface for ProductsInterface {
    const INTERFACE_NAME: &'static str = "product";

    fn transport(&self) -> &OpsiHttpClient {
        &self.transport
    }
}

impl ObjectInterface for ProductsInterface {
    type Object = Product;
}

impl ProductsInterface {
    pub fn new(transport: Arc<OpsiHttpClient>) -> Self {
        Self { transport }
    }

    /// All products, optionally restricted to one product type.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self, product_type: Option<ProductType>) -> Result<Vec<Product>> {
        let filter = match product_type {
            Some(kind) => RequestFilter::with("type", kind.as_opsi_name()),
            None => RequestFilter::new(),
        };
        self.get_all_filtered(filter).await
    }

    /// A single product by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, product_id: &str) -> Result<Product> {
        self.get_filtered(RequestFilter::with("id", product_id))
            .await
    }

    /// Whether a product with this id exists on the server.
    pub async fn exists(&self, product_id: &str) -> Result<bool> {
        self.exists_filtered(RequestFilter::with("id", product_id))
            .await
    }
}
