//! End-to-end tests for the opsictl binary.
//!
//! Config handling runs without a server; the remaining commands run
//! against a wiremock OPSI endpoint.

mod common;

use std::fs;

use common::{opsictl, opsictl_against, rpc, rpc_result, run};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn config_masks_password_and_lists_env_overrides() {
    let home = TempDir::new().unwrap();

    opsictl(&home)
        .env("OPSI_ENDPOINT", "https://opsi.example.org:4447/rpc")
        .args(["config", "--sources", "--password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "endpoint = \"https://opsi.example.org:4447/rpc\"",
        ))
        .stdout(predicate::str::contains("password = \"********\""))
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("# env: OPSI_ENDPOINT"));
}

#[test]
fn config_file_from_command_line() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("site.toml");
    fs::write(
        &file,
        "[server]\nendpoint = \"https://site:4447/rpc\"\n\n[webdav]\nrepository_dir = \"/srv/opsi\"\n",
    )
    .unwrap();

    opsictl(&home)
        .args(["config", "--sources", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"https://site:4447/rpc\""))
        .stdout(predicate::str::contains("repository_dir = \"/srv/opsi\""))
        .stdout(predicate::str::contains("site.toml"));
}

#[test]
fn local_config_file_is_picked_up() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("opsiclient.toml"),
        "[server]\nusername = \"from-local\"\n",
    )
    .unwrap();

    opsictl(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("username = \"from-local\""));
}

#[test]
fn missing_config_file_fails() {
    let home = TempDir::new().unwrap();

    opsictl(&home)
        .args(["config", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.toml"));
}

#[test]
fn commands_need_a_username() {
    let home = TempDir::new().unwrap();

    opsictl(&home)
        .arg("clients")
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.username"));
}

#[test]
fn unknown_action_is_rejected() {
    let home = TempDir::new().unwrap();

    opsictl(&home)
        .args(["set-action", "pc1.example.org", "explode", "firefox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("explode"));
}

#[tokio::test(flavor = "multi_thread")]
async fn clients_as_json() {
    let server = MockServer::start().await;
    rpc("host_getObjects")
        .respond_with(rpc_result(json!([
            { "id": "pc1.example.org", "type": "OpsiClient", "hardwareAddress": "00:11:22:33:44:55" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = opsictl_against(&home, &server.uri());
    cmd.args(["clients", "--json"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"id\": \"pc1.example.org\""))
        .stdout(predicate::str::contains("00:11:22:33:44:55"));
}

#[tokio::test(flavor = "multi_thread")]
async fn set_action_updates_existing_assignment() {
    let server = MockServer::start().await;
    rpc("product_getObjects")
        .respond_with(rpc_result(json!([
            { "id": "firefox", "type": "LocalbootProduct", "setupScript": "setup.opsiscript" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    rpc("productOnClient_getObjects")
        .respond_with(rpc_result(json!([{
            "productId": "firefox",
            "clientId": "pc1.example.org",
            "productType": "LocalbootProduct",
            "actionRequest": "none",
            "type": "ProductOnClient"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    rpc("productOnClient_updateObjects")
        .respond_with(rpc_result(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = opsictl_against(&home, &server.uri());
    cmd.args(["set-action", "pc1.example.org", "setup", "firefox"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("setup requested for firefox"));
}

#[tokio::test(flavor = "multi_thread")]
async fn set_action_for_unknown_product_fails() {
    let server = MockServer::start().await;
    rpc("product_getObjects")
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = opsictl_against(&home, &server.uri());
    cmd.args(["set-action", "pc1.example.org", "setup", "nosuchproduct"]);

    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("nosuchproduct does not exist"));
}

#[tokio::test(flavor = "multi_thread")]
async fn install_uploads_then_installs() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repository/firefox_124.0-1.opsi"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    rpc("depot_installPackage")
        .and(wiremock::matchers::body_partial_json(json!({
            "params": [["/srv/opsi/firefox_124.0-1.opsi"]]
        })))
        .respond_with(rpc_result(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let package = home.path().join("firefox_124.0-1.opsi");
    fs::write(&package, b"cpio archive").unwrap();

    let mut cmd = opsictl_against(&home, &server.uri());
    cmd.env("OPSI_WEBDAV_URL", format!("{}/repository", server.uri()))
        .env("OPSI_REPOSITORY_DIR", "/srv/opsi")
        .arg("install")
        .arg(&package);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("installed /srv/opsi/firefox_124.0-1.opsi"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_upload_fails() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(507))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let package = home.path().join("big.opsi");
    fs::write(&package, b"x").unwrap();

    let mut cmd = opsictl_against(&home, &server.uri());
    cmd.env("OPSI_WEBDAV_URL", format!("{}/repository", server.uri()))
        .arg("upload")
        .arg(&package);

    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("HTTP 507"));
}
