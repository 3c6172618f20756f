//! CLI tests against a mock RU Fit API.

mod common;

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{run_cli_with_env, run_cli_with_env_success, session_file};

fn temp_home() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    (temp_dir, home)
}

/// Run the blocking CLI off the runtime so the mock server keeps serving.
async fn cli(args: &[&str], home: &Path, api_url: &str) -> std::process::Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home = home.to_path_buf();
    let api_url = api_url.to_string();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli_with_env(&args, &home, &api_url)
    })
    .await
    .unwrap()
}

async fn cli_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home = home.to_path_buf();
    let api_url = api_url.to_string();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli_with_env_success(&args, &home, &api_url)
    })
    .await
    .unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "alice", "password": "secret123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "refresh_token": "R1"
        })))
        .mount(server)
        .await;
}

async fn mount_expiry(server: &MockServer, expired: bool) {
    Mock::given(method("POST"))
        .and(path("/auth/is-token-expired"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "expired": expired })))
        .mount(server)
        .await;
}

async fn login(home: &Path, api_url: &str) {
    cli_success(
        &["login", "--username", "alice", "--password", "secret123"],
        home,
        api_url,
    )
    .await;
}

#[test]
fn test_status_without_session() {
    let (_temp, home) = temp_home();

    // Nothing listens on the discard port; no request should be attempted.
    let stdout = run_cli_with_env_success(&["status"], &home, "http://127.0.0.1:9");

    assert!(stdout.contains("not authenticated"), "stdout: {stdout}");
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let (_temp, home) = temp_home();

    let output = run_cli_with_env(&["status"], &home, "http://api.example.com");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid API URL"), "stderr: {stderr}");
}

#[test]
fn test_delete_account_requires_confirmation() {
    let (_temp, home) = temp_home();

    let output = run_cli_with_env(&["delete-account"], &home, "http://127.0.0.1:9");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--yes"), "stderr: {stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_writes_session_file() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let (_temp, home) = temp_home();

    let stdout = cli_success(
        &["login", "--username", "alice", "--password", "secret123"],
        &home,
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("Logged in successfully"), "stdout: {stdout}");

    let raw = std::fs::read_to_string(session_file(&home)).unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["access_token"], "A1");
    assert_eq!(stored["refresh_token"], "R1");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(session_file(&home))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_failure_reports_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;
    let (_temp, home) = temp_home();

    let output = cli(
        &["login", "--username", "alice", "--password", "nope"],
        &home,
        &server.uri(),
    )
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid credentials"), "stderr: {stderr}");
    assert!(!session_file(&home).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_logout_cycle() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_expiry(&server, false).await;
    let (_temp, home) = temp_home();

    login(&home, &server.uri()).await;

    let stdout = cli_success(&["status", "--json"], &home, &server.uri()).await;
    let status: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["state"], "authenticated");
    assert!(status["saved_at"].is_string());

    cli_success(&["logout"], &home, &server.uri()).await;

    let stdout = cli_success(&["status", "--json"], &home, &server.uri()).await;
    let status: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["state"], "not authenticated");
    assert!(status["saved_at"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_with_access_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_expiry(&server, false).await;

    Mock::given(method("GET"))
        .and(path("/tracker"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "calories": 2100 }])))
        .expect(1)
        .mount(&server)
        .await;

    let (_temp, home) = temp_home();
    login(&home, &server.uri()).await;

    let stdout = cli_success(&["request", "get", "/tracker", "--access"], &home, &server.uri()).await;
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body[0]["calories"], 2100);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_with_both_tokens_is_refused() {
    let server = MockServer::start().await;
    let (_temp, home) = temp_home();

    let output = cli(
        &["request", "GET", "/userinfo", "--access", "--refresh"],
        &home,
        &server.uri(),
    )
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("both"), "stderr: {stderr}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_rejection_ends_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "expired": true,
            "reason": "Token has expired"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (_temp, home) = temp_home();
    login(&home, &server.uri()).await;

    let output = cli(&["refresh"], &home, &server.uri()).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Token has expired"), "stderr: {stderr}");

    let raw = std::fs::read_to_string(session_file(&home)).unwrap_or_default();
    assert!(!raw.contains("A1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_userinfo_set_wraps_payload() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_expiry(&server, false).await;

    Mock::given(method("POST"))
        .and(path("/userinfo"))
        .and(body_json(json!({ "user_data": { "goal": "strength" } })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "message": "User info updated successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_temp, home) = temp_home();
    login(&home, &server.uri()).await;

    let stdout = cli_success(
        &["userinfo", "--set", r#"{"goal":"strength"}"#],
        &home,
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("User info updated"));
}
