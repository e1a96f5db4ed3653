//! Helpers for running the opsictl binary in isolation.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockBuilder, ResponseTemplate};

/// An opsictl invocation that sees no config files or `OPSI_*` variables
/// from the machine running the tests.
pub fn opsictl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("opsictl").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("OPSI_CONFIG");
    for var in [
        "OPSI_ENDPOINT",
        "OPSI_USERNAME",
        "OPSI_PASSWORD",
        "OPSI_ACCEPT_INVALID_CERTS",
        "OPSI_TIMEOUT_SECS",
        "OPSI_WEBDAV_URL",
        "OPSI_WEBDAV_TIMEOUT_SECS",
        "OPSI_REPOSITORY_DIR",
        "OPSI_LOG_LEVEL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// `opsictl` pointed at a mock server with credentials set.
pub fn opsictl_against(home: &TempDir, server_uri: &str) -> Command {
    let mut cmd = opsictl(home);
    cmd.env("OPSI_ENDPOINT", format!("{}/rpc", server_uri))
        .env("OPSI_USERNAME", "admin")
        .env("OPSI_PASSWORD", "secret");
    cmd
}

/// Mock for one RPC method on `/rpc`.
pub fn rpc(rpc_method: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": rpc_method })))
}

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "result": result, "error": null }))
}

/// Run a prepared command off the async runtime.
pub async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}
