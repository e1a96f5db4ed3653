use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kinds::ProductAction;

/// Association of a product with one client, carrying installation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOnClient {
    pub product_id: String,
    pub client_id: String,

    #[serde(default)]
    pub product_type: Option<String>,

    /// Pending action (`setup`, `none`, ...). The only field this crate
    /// changes before sending a record back.
    #[serde(default)]
    pub action_request: Option<String>,

    #[serde(default)]
    pub action_progress: Option<String>,
    #[serde(default)]
    pub action_result: Option<String>,
    #[serde(default)]
    pub action_sequence: Option<i64>,
    #[serde(default)]
    pub installation_status: Option<String>,
    #[serde(default)]
    pub last_action: Option<String>,
    #[serde(default)]
    pub target_configuration: Option<String>,
    #[serde(default)]
    pub product_version: Option<String>,
    #[serde(default)]
    pub package_version: Option<String>,
    #[serde(default)]
    pub modification_time: Option<String>,
    #[serde(default)]
    pub ident: Option<String>,

    #[serde(rename = "type", default)]
    pub object_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductOnClient {
    pub fn set_action(&mut self, action: ProductAction) {
        self.action_request = Some(action.as_opsi_name().to_string());
    }
}
