use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// General backend information returned by `backend_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendInfo {
    #[serde(default)]
    pub opsi_version: Option<String>,

    /// Licensed modules as reported by the server.
    #[serde(default)]
    pub modules: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
