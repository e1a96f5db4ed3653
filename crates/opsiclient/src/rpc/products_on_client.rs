//! Product assignments for a single client.

use std::sync::Arc;

use serde_json::Value;

use super::{ObjectInterface, RpcInterface};
use crate::client::OpsiHttpClient;
use crate::error::{OpsiError, Result};
use crate::models::{Host, Product, ProductAction, ProductOnClient};
use crate::types::{Request, RequestFilter};

/// `productOnClient` interface bound to one client. Every query is
/// implicitly filtered by that client's id.
#[derive(Debug, Clone)]
pub struct ProductsOnClientInterface {
    transport: Arc<OpsiHttpClient>,
    client_id: String,
}

impl RpcInterface for ProductsOnClientInterface {
    const INTERFACE_NAME: &'static str = "productOnClient";

    fn transport(&self) -> &OpsiHttpClient {
        &self.transport
    }
}

impl ObjectInterface for ProductsOnClientInterface {
    type Object = ProductOnClient;
}

impl ProductsOnClientInterface {
    pub fn new(transport: Arc<OpsiHttpClient>, client_id: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.is_empty() {
            return Err(OpsiError::invalid_argument("client id must not be empty"));
        }
        Ok(Self {
            transport,
            client_id,
        })
    }

    pub fn for_host(transport: Arc<OpsiHttpClient>, host: &Host) -> Result<Self> {
        Self::new(transport, host.id.clone())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn client_filter(&self) -> RequestFilter {
        RequestFilter::with("clientId", self.client_id.as_str())
    }

    fn product_filter(&self, product_id: &str) -> Result<RequestFilter> {
        self.client_filter().add("productId", product_id)
    }

    /// All products assigned to this client. Fails with `NotFound` if none.
    pub async fn get_all(&self) -> Result<Vec<ProductOnClient>> {
        self.get_all_filtered(self.client_filter()).await
    }

    pub async fn get(&self, product_id: &str) -> Result<ProductOnClient> {
        self.get_filtered(self.product_filter(product_id)?).await
    }

    pub async fn exists(&self, product_id: &str) -> Result<bool> {
        self.exists_filtered(self.product_filter(product_id)?).await
    }

    /// Whether the product is already assigned to this client.
    pub async fn is_product_created(&self, product: &Product) -> Result<bool> {
        match self.get(&product.id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Assign a product to this client.
    ///
    /// Fails with [`OpsiError::ProductAlreadyExists`] if it already is.
    #[tracing::instrument(skip(self, product), fields(client.id = %self.client_id, product.id = %product.id))]
    pub async fn create_product(&self, product: &Product) -> Result<()> {
        let product_type = required_type(product)?;

        if self.is_product_created(product).await? {
            return Err(OpsiError::ProductAlreadyExists {
                product_id: product.id.clone(),
                client_id: self.client_id.clone(),
            });
        }

        let _: Value = self
            .transport
            .call(
                Request::builder(self.full_method_name("create"))
                    .param(product.id.as_str())
                    .param(product_type)
                    .param(self.client_id.as_str()),
            )
            .await?;

        tracing::info!("product assigned to client");
        Ok(())
    }

    /// Request `action` for one product, assigning it first if needed.
    pub async fn set_product_action(&self, product: &Product, action: ProductAction) -> Result<()> {
        self.set_products_action(std::slice::from_ref(product), action)
            .await
    }

    /// Request `action` for several products in one update.
    ///
    /// Repeated product ids are treated as one. Products not yet assigned
    /// to the client are created one after the other, then the client's
    /// assignments are fetched again and every matching record is sent back
    /// in a single `updateObjects` call. Every product needs a type; one
    /// without fails the call before anything is sent. Otherwise the first failure aborts;
    /// nothing is rolled back.
    #[tracing::instrument(
        skip(self, products),
        fields(client.id = %self.client_id, products = products.len(), action = %action)
    )]
    pub async fn set_products_action(
        &self,
        products: &[Product],
        action: ProductAction,
    ) -> Result<()> {
        let mut requested: Vec<&Product> = Vec::with_capacity(products.len());
        for product in products {
            if !requested.iter().any(|seen| seen.id == product.id) {
                requested.push(product);
            }
        }
        // Types are checked before the first request so a bad batch sends nothing
        for product in &requested {
            required_type(product)?;
        }

        let mut assigned = self.current_assignments().await?;

        let missing: Vec<&Product> = requested
            .iter()
            .copied()
            .filter(|product| !assigned.iter().any(|poc| poc.product_id == product.id))
            .collect();

        // Sequential: each create changes server state the next one sees.
        for product in &missing {
            self.create_product(product).await?;
        }

        if !missing.is_empty() {
            assigned = self.current_assignments().await?;
        }

        let mut selected: Vec<ProductOnClient> = assigned
            .into_iter()
            .filter(|poc| requested.iter().any(|product| product.id == poc.product_id))
            .collect();

        if selected.len() < requested.len() {
            tracing::warn!(
                requested = requested.len(),
                found = selected.len(),
                "some products are missing from the client after creation"
            );
        }
        if selected.is_empty() {
            return Ok(());
        }

        for poc in &mut selected {
            poc.set_action(action);
        }

        let _: Value = self
            .transport
            .call(Request::builder(self.full_method_name("updateObjects")).array_param(&selected))
            .await?;

        tracing::info!(updated = selected.len(), "product actions set");
        Ok(())
    }

    /// Assignments for this client; a client without any yields an empty list.
    async fn current_assignments(&self) -> Result<Vec<ProductOnClient>> {
        match self.get_all().await {
            Ok(assigned) => Ok(assigned),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

/// Wire type of a product about to be assigned.
fn required_type(product: &Product) -> Result<&str> {
    product
        .product_type
        .as_deref()
        .ok_or_else(|| OpsiError::InvalidArgument(format!("product {} has no type", product.id)))
}
