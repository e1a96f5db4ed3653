use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Host type name of managed clients.
pub const OPSI_CLIENT_TYPE: &str = "OpsiClient";

/// A host known to the server (client, config server or depot).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Fully qualified host name, e.g. `pc1.example.org`.
    pub id: String,

    #[serde(rename = "type", default)]
    pub host_type: Option<String>,

    #[serde(default)]
    pub ident: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub inventory_number: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub hardware_address: Option<String>,
    #[serde(default)]
    pub one_time_password: Option<String>,
    #[serde(default)]
    pub opsi_host_key: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Host {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_client(&self) -> bool {
        self.host_type.as_deref() == Some(OPSI_CLIENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_client() {
        let host: Host = serde_json::from_value(json!({
            "id": "pc1.example.org",
            "type": "OpsiClient",
            "ipAddress": "10.0.0.12",
            "hardwareAddress": "00:11:22:33:44:55",
            "lastSeen": "2024-03-01 08:00:00",
            "systemUUID": "abc"
        }))
        .unwrap();

        assert!(host.is_client());
        assert_eq!(host.ip_address.as_deref(), Some("10.0.0.12"));
        assert_eq!(host.extra.get("systemUUID"), Some(&json!("abc")));
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let original = json!({ "id": "depot.example.org", "type": "OpsiDepotserver", "depotLocalUrl": "file:///var/lib/opsi/depot" });
        let host: Host = serde_json::from_value(original).unwrap();
        let back = serde_json::to_value(&host).unwrap();

        assert!(!host.is_client());
        assert_eq!(back["depotLocalUrl"], "file:///var/lib/opsi/depot");
        assert_eq!(back["type"], "OpsiDepotserver");
    }
}
