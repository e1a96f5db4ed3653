//! Error types for OPSI client operations.

use std::time::Duration;

/// Result alias used throughout the crate.
pub type Result<T, E = OpsiError> = std::result::Result<T, E>;

/// Errors that can occur when talking to an OPSI server.
///
/// The `Http`, `Server`, `NotFound`, `Timeout`, `Transport` and `Protocol`
/// variants together make up the request error family. Callers that only
/// care whether an RPC call failed can use [`OpsiError::is_request_error`].
#[derive(Debug, thiserror::Error)]
pub enum OpsiError {
    /// A required argument was missing or malformed. Raised before any
    /// network activity.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP status error
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The server answered 200 but reported an application error in the envelope.
    #[error("Server returned an error: {message}")]
    Server { message: String },

    /// A `getObjects` call returned zero rows.
    #[error("No objects returned by {method}")]
    NotFound { method: String },

    /// The call did not complete before its deadline.
    #[error("Request {method} timed out after {timeout:?}")]
    Timeout { method: String, timeout: Duration },

    /// HTTP transport error
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Protocol error (invalid response format)
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Product {product_id} is already defined for client {client_id}")]
    ProductAlreadyExists {
        product_id: String,
        client_id: String,
    },

    /// WebDAV PUT answered something other than 201 Created.
    #[error("Package upload failed: server returned HTTP {status}")]
    PackageUpload { status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpsiError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        OpsiError::InvalidArgument(message.into())
    }

    /// True for every failure of an RPC call itself: bad status, server
    /// error envelope, empty result set, timeout, transport or decoding.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            OpsiError::Http { .. }
                | OpsiError::Server { .. }
                | OpsiError::NotFound { .. }
                | OpsiError::Timeout { .. }
                | OpsiError::Transport(_)
                | OpsiError::Protocol(_)
        )
    }

    /// True when a `getObjects` call matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OpsiError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_family() {
        assert!(OpsiError::Http {
            status: 500,
            body: String::new()
        }
        .is_request_error());
        assert!(OpsiError::Server {
            message: "boom".into()
        }
        .is_request_error());
        assert!(OpsiError::NotFound {
            method: "host_getObjects".into()
        }
        .is_request_error());
        assert!(!OpsiError::invalid_argument("x").is_request_error());
        assert!(!OpsiError::PackageUpload { status: 200 }.is_request_error());
        assert!(!OpsiError::ProductAlreadyExists {
            product_id: "firefox".into(),
            client_id: "pc1.example.org".into(),
        }
        .is_request_error());
    }

    #[test]
    fn test_display_messages() {
        let err = OpsiError::Server {
            message: "Opsi authentication error".into(),
        };
        assert_eq!(
            err.to_string(),
            "Server returned an error: Opsi authentication error"
        );

        let err = OpsiError::PackageUpload { status: 200 };
        assert_eq!(
            err.to_string(),
            "Package upload failed: server returned HTTP 200"
        );
    }
}
