//! Typed OPSI RPC interfaces.
//!
//! The server groups its methods into interfaces addressed as
//! `{interface}_{method}` (`host_getObjects`, `productOnClient_create`).
//! [`RpcInterface`] captures that naming; [`ObjectInterface`] adds the
//! generic `getObjects` queries shared by every object-backed interface.
//! The concrete interfaces are thin wrappers holding a shared transport.

mod backend;
mod depot;
mod host;
mod products;
mod products_on_client;

pub use backend::BackendInterface;
pub use depot::{DepotInterface, PACKAGE_TIMEOUT};
pub use host::HostInterface;
pub use products::ProductsInterface;
pub use products_on_client::ProductsOnClientInterface;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::OpsiHttpClient;
use crate::error::{OpsiError, Result};
use crate::types::{Request, RequestFilter};

/// A named group of server methods.
pub trait RpcInterface {
    /// Prefix of every method in this interface.
    const INTERFACE_NAME: &'static str;

    fn transport(&self) -> &OpsiHttpClient;

    /// Returns `{interface}_{name}`.
    fn full_method_name(&self, name: &str) -> String {
        format!("{}_{}", Self::INTERFACE_NAME, name)
    }
}

/// An interface whose `getObjects` method returns records of one type.
///
/// NOTE: `get_all_filtered` and `get_filtered` treat an empty result as
/// [`OpsiError::NotFound`] instead of returning an empty list. Existing
/// callers rely on that. Use `exists_filtered` to test for matches without
/// an error.
#[async_trait]
pub trait ObjectInterface: RpcInterface + Send + Sync {
    type Object: DeserializeOwned + Send;

    /// All objects matching `filter`. Fails with `NotFound` on zero rows.
    async fn get_all_filtered(&self, filter: RequestFilter) -> Result<Vec<Self::Object>> {
        let method = self.full_method_name("getObjects");
        let objects: Vec<Self::Object> = self
            .transport()
            .call(Request::builder(method.as_str()).filter(filter))
            .await?;

        if objects.is_empty() {
            return Err(OpsiError::NotFound { method });
        }
        Ok(objects)
    }

    /// All objects. Fails with `NotFound` if the server has none.
    async fn get_all_objects(&self) -> Result<Vec<Self::Object>> {
        self.get_all_filtered(RequestFilter::new()).await
    }

    /// First object matching `filter`.
    async fn get_filtered(&self, filter: RequestFilter) -> Result<Self::Object> {
        let method = self.full_method_name("getObjects");
        self.get_all_filtered(filter)
            .await?
            .into_iter()
            .next()
            .ok_or(OpsiError::NotFound { method })
    }

    /// Whether any object matches `filter`. Zero rows is `Ok(false)`.
    async fn exists_filtered(&self, filter: RequestFilter) -> Result<bool> {
        let rows: Vec<Value> = self
            .transport()
            .call(Request::builder(self.full_method_name("getObjects")).filter(filter))
            .await?;
        Ok(!rows.is_empty())
    }
}
