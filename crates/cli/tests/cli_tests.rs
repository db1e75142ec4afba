//! CLI integration tests

use mockito::{Matcher, Server};
use std::process::{Command, Output};
use tempfile::TempDir;

const MIB: u64 = 1024 * 1024;

/// Run the podsizer binary with a clean environment and an empty home dir
fn podsizer(args: &[&str]) -> Output {
    let home = TempDir::new().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_podsizer"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("DATADOG_API_KEY")
        .env_remove("DATADOG_APP_KEY")
        .env_remove("DATADOG_API_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn series_body(values: &[u64]) -> String {
    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("[{}.0, {}.0]", 1_700_000_000_000u64 + i as u64 * 300_000, v))
        .collect();
    format!(
        r#"{{"status": "ok", "series": [{{"interval": 300, "aggr": "max", "pointlist": [{}]}}]}}"#,
        points.join(", ")
    )
}

fn query_matcher(query: &str) -> Matcher {
    Matcher::UrlEncoded("query".into(), query.into())
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = podsizer(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Determine memory and cpu requests and limits"),
        "Should show about text"
    );
    assert!(stdout.contains("--helm-release"), "Should show helm release");
    assert!(stdout.contains("--kube-container"), "Should show container");
    assert!(stdout.contains("DATADOG_API_KEY"), "Should show API key env var");
    assert!(stdout.contains("DATADOG_APP_KEY"), "Should show app key env var");
    assert!(stdout.contains("--format"), "Should show format option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = podsizer(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("podsizer 0.1."), "Should show 0.1.<build>");
}

/// Missing release fails before any query is issued
#[test]
fn test_missing_release() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/v1/query")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let url = server.url();
    let output = podsizer(&[
        "--datadog-api-key",
        "k",
        "--datadog-app-key",
        "a",
        "--api-url",
        &url,
        "-c",
        "web",
    ]);

    assert!(!output.status.success(), "Missing release should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("mandatory"),
        "Should explain mandatory parameters: {stderr}"
    );
    mock.assert();
}

/// Missing API key is a configuration error too
#[test]
fn test_missing_api_key() {
    let output = podsizer(&["--datadog-app-key", "a", "-r", "checkout", "-c", "web"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API key"), "Should mention API key: {stderr}");
}

/// Full run against a mock Datadog backend
#[test]
fn test_estimate_against_mock_backend() {
    let mut server = Server::new();

    let max_memory = server
        .mock("GET", "/api/v1/query")
        .match_header("DD-API-KEY", "test-api-key")
        .match_header("DD-APPLICATION-KEY", "test-app-key")
        .match_query(query_matcher(
            "max:kubernetes.memory.usage{helm_release:checkout,kube_container_name:web}",
        ))
        .with_status(200)
        .with_body(series_body(&[100 * MIB, 200 * MIB]))
        .expect(7)
        .create();
    let avg_memory = server
        .mock("GET", "/api/v1/query")
        .match_query(query_matcher(
            "avg:kubernetes.memory.usage{helm_release:checkout,kube_container_name:web}",
        ))
        .with_status(200)
        .with_body(series_body(&[10 * MIB, 20 * MIB, 30 * MIB]))
        .expect(1)
        .create();
    let max_cpu = server
        .mock("GET", "/api/v1/query")
        .match_query(query_matcher(
            "max:kubernetes.cpu.usage.total{helm_release:checkout,kube_container_name:web}",
        ))
        .with_status(200)
        .with_body(series_body(&[250_000_000, 500_000_000]))
        .expect(7)
        .create();
    let avg_cpu = server
        .mock("GET", "/api/v1/query")
        .match_query(query_matcher(
            "avg:kubernetes.cpu.usage.total{helm_release:checkout,kube_container_name:web}",
        ))
        .with_status(200)
        .with_body(series_body(&[100_000_000, 300_000_000]))
        .expect(1)
        .create();

    let url = server.url();
    let output = podsizer(&[
        "--datadog-api-key",
        "test-api-key",
        "--datadog-app-key",
        "test-app-key",
        "--api-url",
        &url,
        "-r",
        "checkout",
        "-c",
        "web",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Estimate should succeed: {stderr}");

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Max Memory: 200 M in last week",
            "Avg Memory: 20 M in last day",
            "Max milliCore: 500.00",
            "Avg milliCore: 200.00",
        ]
    );

    max_memory.assert();
    avg_memory.assert();
    max_cpu.assert();
    avg_cpu.assert();
}

/// Backend rejection ends the run with no partial output
#[test]
fn test_backend_failure() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/api/v1/query")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"errors": ["Forbidden"]}"#)
        .create();

    let url = server.url();
    let output = podsizer(&[
        "--datadog-api-key",
        "bad",
        "--datadog-app-key",
        "bad",
        "--api-url",
        &url,
        "-r",
        "checkout",
        "-c",
        "web",
    ]);

    assert!(!output.status.success(), "Forbidden should fail");
    assert!(output.stdout.is_empty(), "No partial output expected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("403"), "Should report status: {stderr}");
}

/// Config file supplies the API URL when no flag is given
#[test]
fn test_config_file_api_url() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/v1/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "ok", "series": []}"#)
        .expect(16)
        .create();

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("podsizer.json");
    std::fs::write(
        &config_path,
        format!(r#"{{"api_url": "{}", "timeout_secs": 5}}"#, server.url()),
    )
    .unwrap();

    let output = podsizer(&[
        "--datadog-api-key",
        "k",
        "--datadog-app-key",
        "a",
        "--config",
        config_path.to_str().unwrap(),
        "-r",
        "checkout",
        "-c",
        "web",
        "--format",
        "json",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Should succeed: {stderr}");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["max_memory_mib"], 0.0);
    assert_eq!(value["avg_cpu_millicores"], 0.0);
    mock.assert();
}

/// Invalid arguments are rejected by clap
#[test]
fn test_invalid_format() {
    let output = podsizer(&["--format", "yaml"]);

    assert!(!output.status.success(), "Invalid format should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value") || stderr.contains("error"));
}
