//! Integration tests for the `mockctl` CLI binary.
//!
//! Argument parsing, help output and error handling run without a
//! server; the end-to-end cases talk to a wiremock admin API.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mockctl` binary with env isolation.
///
/// Clears all `MOCKCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn mockctl_cmd() -> assert_cmd::Command {
    mockctl_cmd_with_home(Path::new("/tmp/mockctl-test-nonexistent"))
}

/// Like [`mockctl_cmd`], with `home` as both `HOME` and the XDG root.
fn mockctl_cmd_with_home(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mockctl");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env_remove("MOCKCTL_PROFILE")
        .env_remove("MOCKCTL_SERVER")
        .env_remove("MOCKCTL_GROUP")
        .env_remove("MOCKCTL_OUTPUT")
        .env_remove("MOCKCTL_INSECURE")
        .env_remove("MOCKCTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Write `body` as the config file under `home` and return its path.
fn write_config(home: &Path, body: &str) -> PathBuf {
    let dir = home.join(".config").join("mockctl");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn service_json(id: i64, name: &str, timeout: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "typeRequest": "REST",
        "httpMethod": "GET",
        "localTarget": format!("/mock/{name}"),
        "remoteTarget": format!("http://backend/{name}"),
        "timeoutms": timeout,
        "recordXmlData": false,
        "recordData": true,
        "useMockGroup": false,
        "mockGroupId": 1,
        "environmentName": "qa"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = mockctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    mockctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("services")
            .and(predicate::str::contains("service-actions"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    mockctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mockctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    mockctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    mockctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mockctl"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = mockctl_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_output_format() {
    let output = mockctl_cmd()
        .args(["-o", "xml", "services", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("xml"));
}

#[test]
fn test_services_list_without_server() {
    let output = mockctl_cmd().args(["services", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No mock server configured"), "unexpected output:\n{text}");
}

#[test]
fn test_unknown_profile() {
    let output = mockctl_cmd()
        .args(["--profile", "prod", "services", "list"])
        .output()
        .unwrap();
    let text = combined_output(&output);
    assert!(text.contains("Profile 'prod' not found"), "unexpected output:\n{text}");
}

#[test]
fn test_config_path_prints_location() {
    mockctl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_subcommands_exist() {
    mockctl_cmd()
        .args(["services", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("new"))
                .and(predicate::str::contains("edit"))
                .and(predicate::str::contains("delete")),
        );
    mockctl_cmd()
        .args(["service-actions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("regenerate"));
}

// ── Config file ─────────────────────────────────────────────────────

#[test]
fn test_config_use_switches_default_profile() {
    let home = tempfile::tempdir().unwrap();
    let path = write_config(
        home.path(),
        r#"
default_profile = "local"

[profiles.local]
server = "http://localhost:9010"

[profiles.staging]
server = "http://staging:9010"
group = "billing"
"#,
    );

    mockctl_cmd_with_home(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout("local *\nstaging\n");

    mockctl_cmd_with_home(home.path())
        .args(["config", "use", "staging"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains(r#"default_profile = "staging""#), "{written}");

    mockctl_cmd_with_home(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout("local\nstaging *\n");
}

#[test]
fn test_config_use_rejects_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        "[profiles.local]\nserver = \"http://localhost:9010\"\n",
    );

    let output = mockctl_cmd_with_home(home.path())
        .args(["config", "use", "prod"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("Profile 'prod' not found"));
}

// ── Against a mock admin API ────────────────────────────────────────

#[tokio::test]
async fn test_services_list_json_is_sorted_and_paged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/billing/findall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                service_json(1, "quotes", 500),
                service_json(2, "Accounts", 100),
                service_json(3, "orders", 300)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = mockctl_cmd()
        .args(["--server", &server.uri(), "--group", "billing", "-o", "json"])
        .args(["services", "list", "--count", "2"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Accounts", "orders"]);
    assert_eq!(rows[0]["recordData"], "yes");
}

#[tokio::test]
async fn test_default_profile_supplies_server_and_group() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/billing/findall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [service_json(7, "invoices", 200)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        &format!(
            "default_profile = \"staging\"\n\n[profiles.staging]\nserver = \"{}\"\ngroup = \"billing\"\n",
            server.uri()
        ),
    );

    let output = mockctl_cmd_with_home(home.path())
        .args(["-o", "plain", "services", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7");
}

#[tokio::test]
async fn test_services_list_filter_and_descending_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/all/findall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                service_json(1, "quotes", 500),
                service_json(2, "quote-archive", 100),
                service_json(3, "orders", 300)
            ]
        })))
        .mount(&server)
        .await;

    let output = mockctl_cmd()
        .args(["--server", &server.uri(), "-o", "plain"])
        .args(["services", "list", "--filter", "QUOTE", "--sort", "-timeoutms"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1\n2");
}

#[tokio::test]
async fn test_service_edit_sends_working_copy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_json(3, "orders", 300)))
        .mount(&server)
        .await;
    for list in ["/environments/all/findall", "/mockgroups/all/findall"] {
        Mock::given(method("GET"))
            .and(path(list))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;
    }
    Mock::given(method("PUT"))
        .and(path("/services/3"))
        .and(body_partial_json(json!({
            "id": 3,
            "timeoutms": 900,
            "recordXmlData": "yes"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    mockctl_cmd()
        .args(["--server", &server.uri()])
        .args(["services", "edit", "3", "--set", "timeoutms=900"])
        .args(["--set", "recordXmlData=yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Service 3 updated"));
}

#[tokio::test]
async fn test_rejected_save_prints_server_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/serviceactions/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "getQuote", "thresholdms": 100, "groups": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/serviceactions/4"))
        .respond_with(ResponseTemplate::new(500).set_body_string("threshold locked by admin"))
        .mount(&server)
        .await;

    let output = mockctl_cmd()
        .args(["--server", &server.uri()])
        .args(["service-actions", "edit", "4", "--set", "thresholdms=250"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("threshold locked by admin"));
}

#[tokio::test]
async fn test_missing_service_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = mockctl_cmd()
        .args(["--server", &server.uri(), "services", "get", "99"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test]
async fn test_delete_requires_yes_without_terminal() {
    let server = MockServer::start().await;

    let output = mockctl_cmd()
        .args(["--server", &server.uri(), "services", "delete", "3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test]
async fn test_regenerate_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/serviceactions/regenerate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/serviceactions/findall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "name": "getQuote", "thresholdms": 100 }]
        })))
        .mount(&server)
        .await;

    mockctl_cmd()
        .args(["--server", &server.uri(), "service-actions", "regenerate"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Success generate ServiceAction list")
                .and(predicate::str::contains("1 service actions")),
        );
}

#[tokio::test]
async fn test_regenerate_failure_shows_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/serviceactions/regenerate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let output = mockctl_cmd()
        .args(["--server", &server.uri(), "service-actions", "regenerate"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(
        combined_output(&output).contains("Error with generate ServiceAction list. See server logs.")
    );
}
