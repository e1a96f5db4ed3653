use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kinds::{ProductAction, ProductType};
use crate::error::{OpsiError, Result};

/// A product available on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Wire name of the product type (`LocalbootProduct`, `NetbootProduct`).
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,

    #[serde(default)]
    pub ident: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub changelog: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub product_version: Option<String>,
    #[serde(default)]
    pub package_version: Option<String>,
    #[serde(default)]
    pub license_required: Option<bool>,
    #[serde(default)]
    pub windows_software_ids: Option<Vec<String>>,
    #[serde(default)]
    pub product_class_ids: Option<Vec<String>>,

    #[serde(default)]
    pub setup_script: Option<String>,
    #[serde(default)]
    pub uninstall_script: Option<String>,
    #[serde(default)]
    pub update_script: Option<String>,
    #[serde(default)]
    pub always_script: Option<String>,
    #[serde(default)]
    pub once_script: Option<String>,
    #[serde(default)]
    pub custom_script: Option<String>,
    #[serde(default)]
    pub user_login_script: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_set(script: &Option<String>) -> bool {
    script.as_deref().is_some_and(|s| !s.is_empty())
}

impl Product {
    pub fn new(id: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            id: id.into(),
            product_type: Some(product_type.as_opsi_name().to_string()),
            ..Default::default()
        }
    }

    /// Parsed product type. Fails if the server sent none or an unknown one.
    pub fn kind(&self) -> Result<ProductType> {
        self.product_type
            .as_deref()
            .ok_or_else(|| {
                OpsiError::InvalidArgument(format!("product {} has no type", self.id))
            })?
            .parse()
    }

    pub fn has_setup_script(&self) -> bool {
        is_set(&self.setup_script)
    }

    pub fn has_uninstall_script(&self) -> bool {
        is_set(&self.uninstall_script)
    }

    pub fn has_update_script(&self) -> bool {
        is_set(&self.update_script)
    }

    pub fn has_always_script(&self) -> bool {
        is_set(&self.always_script)
    }

    pub fn has_once_script(&self) -> bool {
        is_set(&self.once_script)
    }

    pub fn has_custom_script(&self) -> bool {
        is_set(&self.custom_script)
    }

    /// Actions this product has a script for.
    pub fn available_actions(&self) -> Vec<ProductAction> {
        [
            (self.has_setup_script(), ProductAction::Setup),
            (self.has_custom_script(), ProductAction::Custom),
            (self.has_uninstall_script(), ProductAction::Uninstall),
            (self.has_update_script(), ProductAction::Update),
            (self.has_always_script(), ProductAction::Always),
            (self.has_once_script(), ProductAction::Once),
        ]
        .into_iter()
        .filter_map(|(present, action)| present.then_some(action))
        .collect()
    }
}
