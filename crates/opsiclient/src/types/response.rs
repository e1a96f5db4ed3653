//! OPSI RPC response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OpsiError, Result};

/// Error object reported inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human-readable description.
    pub message: String,

    /// Server-side exception class, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Response body of one RPC call.
///
/// `error` wins over `result`: OPSI reports application failures with
/// HTTP 200 and a populated `error` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope<T = Value> {
    pub id: Option<u64>,

    #[serde(alias = "Result")]
    pub result: Option<T>,

    #[serde(alias = "Error")]
    pub error: Option<ErrorInfo>,
}

impl<T> ResponseEnvelope<T> {
    /// Split the envelope into its payload or the server error.
    pub fn into_data(self) -> Result<Option<T>> {
        match self.error {
            Some(error) => Err(OpsiError::Server {
                message: error.message,
            }),
            None => Ok(self.result),
        }
    }
}
