//! Integration tests for the `unigate` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a backend; the session tests point the binary at a wiremock
//! server with a token seeded into the file store.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `unigate` binary with env isolation.
///
/// Clears all `UNIGATE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn unigate_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unigate");
    cmd.env("HOME", "/tmp/unigate-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/unigate-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/unigate-cli-test-nonexistent")
        .env_remove("UNIGATE_PROFILE")
        .env_remove("UNIGATE_API_URL")
        .env_remove("UNIGATE_TOKEN_STORE")
        .env_remove("UNIGATE_OUTPUT")
        .env_remove("UNIGATE_INSECURE")
        .env_remove("UNIGATE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command whose data directory is `data_home`, with the token for the
/// default profile pre-seeded into the file store.
fn seeded_cmd(data_home: &Path, token: &str) -> assert_cmd::Command {
    let token_file = data_home.join("unigate").join("tokens").join("default");
    std::fs::create_dir_all(token_file.parent().unwrap()).unwrap();
    std::fs::write(&token_file, token).unwrap();

    let mut cmd = unigate_cmd();
    cmd.env("XDG_DATA_HOME", data_home)
        .args(["--token-store", "file"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a blocking command from inside a tokio test.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn student() -> serde_json::Value {
    json!({
        "id": 42,
        "firstName": "Ana",
        "lastName": "Petrova",
        "email": "ana@uni.edu",
        "role": "Student"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = unigate_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    unigate_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("campus access control")
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("history"))
            .and(predicate::str::contains("rules")),
    );
}

#[test]
fn test_version_flag() {
    unigate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unigate"));
}

#[test]
fn test_subcommand_help_lists_actions() {
    unigate_cmd()
        .args(["rules", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("my")
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("delete")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    unigate_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    unigate_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = unigate_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = unigate_cmd()
        .args(["--output", "invalid", "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_role_is_rejected_by_parser() {
    let output = unigate_cmd()
        .args(["rules", "create", "--role", "Janitor", "--zone", "Gym"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_whoami_without_session_exits_with_auth_code() {
    let output = unigate_cmd()
        .args(["--token-store", "memory", "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("unigate login"));
}

#[test]
fn test_inverted_analytics_range_is_a_usage_error() {
    let output = unigate_cmd()
        .args([
            "--token-store",
            "memory",
            "analytics",
            "--from",
            "2025-05-02",
            "--to",
            "2025-05-01",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_profile() {
    let output = unigate_cmd()
        .args(["--profile", "nowhere", "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("nowhere"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    unigate_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_path_points_at_config_toml() {
    unigate_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_unknown_profile() {
    let output = unigate_cmd()
        .args(["config", "use", "ghost"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_whoami_sends_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .and(header("authorization", "Bearer seeded-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(student()))
        .expect(1)
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    let mut cmd = seeded_cmd(data.path(), "seeded-token");
    cmd.args(["--api-url", &server.uri(), "-o", "json", "whoami"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let user: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(user["email"], "ana@uni.edu");
    assert_eq!(user["role"], "Student");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejected_token_is_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    let mut cmd = seeded_cmd(data.path(), "stale-token");
    cmd.args(["--api-url", &server.uri(), "whoami"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Session expired"));
    assert!(!data.path().join("unigate/tokens/default").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rules_my_plain_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accessrule/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 3,
                "userRole": "Student",
                "zoneType": "Library",
                "hasAccess": true,
                "startTime": "08:00:00",
                "endTime": "20:00:00"
            },
            {
                "id": 9,
                "userRole": 4,
                "zoneType": 1,
                "hasAccess": false
            }
        ])))
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    let mut cmd = seeded_cmd(data.path(), "t");
    cmd.args(["--api-url", &server.uri(), "-o", "plain", "rules", "my"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3\n9");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_without_yes_in_non_interactive_shell() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    let mut cmd = seeded_cmd(data.path(), "t");
    cmd.args(["--api-url", &server.uri(), "rules", "delete", "5"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_users_avatar_uploads_the_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/update-avatar"))
        .and(header("authorization", "Bearer t"))
        .and(body_string_contains(r#"filename="face.jpg""#))
        .and(body_string_contains("not really a jpeg"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"avatarUrl": "/avatars/42.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    let image = data.path().join("face.jpg");
    std::fs::write(&image, "not really a jpeg").unwrap();

    let mut cmd = seeded_cmd(data.path(), "t");
    cmd.args(["--api-url", &server.uri(), "users", "avatar"])
        .arg(&image);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("/avatars/42.jpg"));
}
