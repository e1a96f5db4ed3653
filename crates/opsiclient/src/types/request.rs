//! OPSI RPC requests.
//!
//! OPSI reads arguments by position, so the `params` array has a fixed
//! layout: `[positional, attributes?, filter?]`. When a filter is present
//! the attributes slot must be filled (with `[]` if nothing is projected),
//! otherwise the server reads the filter as the attribute list.

use serde::Serialize;
use serde_json::Value;

use super::filter::RequestFilter;
use crate::error::{OpsiError, Result};

/// A single OPSI RPC call, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: String,
    params: Vec<Value>,
    attributes: Vec<String>,
    filter: RequestFilter,
    id: u64,
}

impl Request {
    /// Start building a request for the given full method name
    /// (e.g. `host_getObjects`).
    pub fn builder(method: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn filter(&self) -> &RequestFilter {
        &self.filter
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The JSON body sent to the server.
    pub fn to_wire(&self) -> Value {
        let mut params = vec![Value::Array(self.params.clone())];

        if !self.attributes.is_empty() {
            params.push(Value::Array(
                self.attributes.iter().cloned().map(Value::String).collect(),
            ));
        }

        if self.filter.has_elements() {
            if self.attributes.is_empty() {
                params.push(Value::Array(Vec::new()));
            }
            params.push(self.filter.to_json());
        }

        serde_json::json!({
            "method": self.method,
            "params": params,
            "id": self.id,
        })
    }
}

/// Builder for [`Request`].
///
/// Each step consumes and returns the builder. A parameter that cannot be
/// represented is remembered and reported by [`RequestBuilder::build`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: String,
    params: Vec<Value>,
    attributes: Vec<String>,
    filter: RequestFilter,
    error: Option<String>,
}

impl RequestBuilder {
    fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
            attributes: Vec::new(),
            filter: RequestFilter::new(),
            error: None,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Append a scalar string parameter.
    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.params.push(Value::String(value.into()));
        self
    }

    /// Append several scalar string parameters.
    pub fn params<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params
            .extend(values.into_iter().map(|v| Value::String(v.into())));
        self
    }

    /// Append a raw JSON parameter. `null` is rejected.
    pub fn value_param(mut self, value: Value) -> Self {
        if value.is_null() {
            self.record_error("parameter must not be null");
        } else {
            self.params.push(value);
        }
        self
    }

    /// Append a structured parameter, serialized with its serde representation.
    pub fn object_param<T: Serialize + ?Sized>(self, object: &T) -> Self {
        match serde_json::to_value(object) {
            Ok(value) => self.value_param(value),
            Err(e) => {
                let mut builder = self;
                builder.record_error(format!("parameter is not serializable: {}", e));
                builder
            }
        }
    }

    /// Append a list of objects as ONE array parameter.
    ///
    /// Without the wrapping the server would see each element as its own
    /// positional argument.
    pub fn array_param<T: Serialize>(self, objects: &[T]) -> Self {
        let mut items = Vec::with_capacity(objects.len());
        for object in objects {
            match serde_json::to_value(object) {
                Ok(Value::Null) => {
                    let mut builder = self;
                    builder.record_error("array element must not be null");
                    return builder;
                }
                Ok(value) => items.push(value),
                Err(e) => {
                    let mut builder = self;
                    builder.record_error(format!("array element is not serializable: {}", e));
                    return builder;
                }
            }
        }
        self.value_param(Value::Array(items))
    }

    /// Project the result onto one attribute.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replace the filter.
    pub fn filter(mut self, filter: RequestFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Finish the request with the given id.
    pub fn build(self, id: u64) -> Result<Request> {
        if let Some(message) = self.error {
            return Err(OpsiError::InvalidArgument(message));
        }
        if self.method.is_empty() {
            return Err(OpsiError::invalid_argument("method name must not be empty"));
        }

        Ok(Request {
            method: self.method,
            params: self.params,
            attributes: self.attributes,
            filter: self.filter,
            id,
        })
    }

    fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }
}
