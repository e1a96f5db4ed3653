//! OPSI RPC wire types
//!
//! - `filter` - field/value equality filters for `getObjects` calls
//! - `request` - request builder and the positional wire form
//! - `response` - response envelope and server error data

pub mod filter;
pub mod request;
pub mod response;

pub use filter::RequestFilter;
pub use request::{Request, RequestBuilder};
pub use response::{ErrorInfo, ResponseEnvelope};
