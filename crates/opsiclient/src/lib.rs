//! opsiclient - Client library for the OPSI JSON-RPC backend
//!
//! Talks to an OPSI server's `/rpc` endpoint using the positional
//! request shape OPSI expects, and stages package files through the
//! server's WebDAV repository.
//!
//! # Features
//!
//! - **Requests**: Build `{interface}_{method}` calls with parameters,
//!   attribute projection and filters
//! - **Transport**: Basic auth, session cookies, per-call timeouts, optional
//!   acceptance of self-signed certificates
//! - **Interfaces**: Typed access to backend, hosts, products, depot and
//!   product-on-client associations
//! - **Upload**: WebDAV PUT of package files
//!
//! # Example
//!
//! ```rust,ignore
//! use opsiclient::{OpsiClient, ProductAction};
//!
//! let client = OpsiClient::new("https://opsi.example.org:4447/rpc", "admin", "secret", false)?;
//!
//! let clients = client.hosts().get_clients().await?;
//! let firefox = client.products().get("firefox").await?;
//!
//! for host in &clients {
//!     client
//!         .products_on_host(host)?
//!         .set_product_action(&firefox, ProductAction::Setup)
//!         .await?;
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod rpc;
pub mod types;

// Re-export commonly used types at crate root
pub use client::{ClientOptions, OpsiClient, OpsiHttpClient, PackageUploader};
pub use error::{OpsiError, Result};
pub use models::{BackendInfo, Host, Product, ProductAction, ProductOnClient, ProductType};
pub use rpc::{
    BackendInterface, DepotInterface, HostInterface, ObjectInterface, ProductsInterface,
    ProductsOnClientInterface, RpcInterface,
};
pub use types::{ErrorInfo, Request, RequestBuilder, RequestFilter, ResponseEnvelope};
