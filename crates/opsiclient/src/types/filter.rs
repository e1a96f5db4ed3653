//! Server-side object filters.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{OpsiError, Result};

/// Field/value equality pairs narrowing a `getObjects` query.
///
/// Keys are unique. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    entries: Vec<(String, String)>,
}

impl RequestFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with a single entry.
    pub fn with(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entries: vec![(key.into(), value.into())],
        }
    }

    /// Add a key/value pair. Fails if the key is already present.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(OpsiError::invalid_argument("filter key must not be empty"));
        }
        if self.get(&key).is_some() {
            return Err(OpsiError::invalid_argument(format!(
                "filter key '{}' is already set",
                key
            )));
        }
        self.entries.push((key, value.into()));
        Ok(self)
    }

    /// Does the filter contain any elements?
    pub fn has_elements(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON object form used as the last positional parameter.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for RequestFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter() {
        let filter = RequestFilter::new();
        assert!(!filter.has_elements());
        assert_eq!(filter.to_json(), json!({}));
    }

    #[test]
    fn test_add_entries() {
        let filter = RequestFilter::new()
            .add("clientId", "pc1.example.org")
            .unwrap()
            .add("productId", "firefox")
            .unwrap();

        assert_eq!(filter.len(), 2);
        assert_eq!(filter.get("productId"), Some("firefox"));
        assert_eq!(
            filter.to_json(),
            json!({ "clientId": "pc1.example.org", "productId": "firefox" })
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = RequestFilter::with("id", "a").add("id", "b").unwrap_err();
        assert!(matches!(err, OpsiError::InvalidArgument(_)));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let filter = RequestFilter::with("type", "OpsiClient");
        assert_eq!(serde_json::to_value(&filter).unwrap(), filter.to_json());
    }
}
