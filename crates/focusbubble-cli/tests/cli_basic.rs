//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against the given data dir and return output.
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusbubble-cli", "--"])
        .args(args)
        .env("FOCUSBUBBLE_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn session_status_reports_inactive() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["session", "status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"phase\": \"inactive\""));
}

#[test]
fn session_start_then_complete_lands_in_history() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["session", "start"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Session started."));

    let (stdout, _, code) = run_cli(dir.path(), &["session", "complete"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Session completed:"));

    let (stdout, _, code) = run_cli(dir.path(), &["stats", "history", "--json"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"distraction_count\": 0"));
}

#[test]
fn prefs_set_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["prefs", "set", "volume", "0.3"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("volume = 0.3"));

    let (stdout, _, code) = run_cli(dir.path(), &["prefs", "get", "volume"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0.3");

    // Other fields keep their defaults.
    let (stdout, _, code) = run_cli(dir.path(), &["prefs", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("max_distractions = 3"));
}

#[test]
fn prefs_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["prefs", "get", "nonexistent"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown key"));
}

#[test]
fn data_clear_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["data", "clear"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("--yes"));

    let (stdout, _, code) = run_cli(dir.path(), &["data", "clear", "--yes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("cleared"));
}
