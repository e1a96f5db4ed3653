//! Common test utilities for opsiclient integration tests
//!
//! Wraps a wiremock server that understands the OPSI request shape so tests
//! can mock individual RPC methods and filters.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use opsiclient::OpsiClient;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
/// base64("admin:secret")
pub const BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

/// A mock OPSI server on an ephemeral port.
pub struct MockOpsi {
    pub server: MockServer,
}

impl MockOpsi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn rpc_url(&self) -> String {
        format!("{}/rpc", self.server.uri())
    }

    pub fn client(&self) -> OpsiClient {
        OpsiClient::new(&self.rpc_url(), USERNAME, PASSWORD, false).unwrap()
    }

    /// Mock builder for POSTs to `/rpc` calling `rpc_method`.
    pub fn rpc(&self, rpc_method: &str) -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(RpcMethod(rpc_method.to_string()))
    }

    /// Body of every RPC request received so far.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    /// Names of the RPC methods received so far, in order.
    pub async fn received_methods(&self) -> Vec<String> {
        self.received_bodies()
            .await
            .iter()
            .filter_map(|b| b["method"].as_str().map(str::to_string))
            .collect()
    }
}

/// 200 response carrying `result`.
pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "result": result, "error": null }))
}

/// 200 response carrying an OPSI error object.
pub fn rpc_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": 1,
        "result": null,
        "error": { "message": message, "class": "BackendError" }
    }))
}

fn body_json(request: &Request) -> Option<Value> {
    serde_json::from_slice(&request.body).ok()
}

/// Matches the `method` field of the JSON-RPC body.
pub struct RpcMethod(pub String);

impl Match for RpcMethod {
    fn matches(&self, request: &Request) -> bool {
        body_json(request)
            .map(|body| body["method"] == self.0.as_str())
            .unwrap_or(false)
    }
}

/// Matches the filter object (last element of a three-element `params`).
pub struct RpcFilter(pub Value);

impl Match for RpcFilter {
    fn matches(&self, request: &Request) -> bool {
        body_json(request)
            .and_then(|body| body["params"].as_array().cloned())
            .map(|params| params.len() == 3 && params[2] == self.0)
            .unwrap_or(false)
    }
}

pub fn product_on_client(product_id: &str, client_id: &str, action: &str) -> Value {
    json!({
        "productId": product_id,
        "clientId": client_id,
        "productType": "LocalbootProduct",
        "actionRequest": action,
        "installationStatus": "not_installed",
        "type": "ProductOnClient"
    })
}
