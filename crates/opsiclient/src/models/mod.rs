//! Records returned by the OPSI server.
//!
//! Field names follow the server's camelCase. Fields this crate does not
//! model are kept in `extra` so a record can be sent back unchanged.

pub mod backend;
pub mod host;
pub mod kinds;
pub mod product;
pub mod product_on_client;

pub use backend::BackendInfo;
pub use host::Host;
pub use kinds::{ProductAction, ProductType};
pub use product::Product;
pub use product_on_client::ProductOnClient;
