//! Integration tests for top-level CLI behavior.

use std::path::PathBuf;
use std::process::Command;

fn issue_upsert() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_issue-upsert"));
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_API_URL")
        .env_remove("ISSUE_UPSERT_RECORD");
    cmd
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn help_lists_sync_subcommand() {
    let output = issue_upsert().arg("--help").output().expect("failed to run binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("sync"));
}

#[test]
fn sync_help_shows_options() {
    let output = issue_upsert().args(["sync", "--help"]).output().expect("failed to run binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--max-retries"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = issue_upsert().arg("frobnicate").output().expect("failed to run binary");
    assert!(!output.status.success());
}

#[test]
fn missing_token_exits_with_failure() {
    let dir = scratch_dir("issue_upsert_cli_no_token");
    let output = issue_upsert()
        .current_dir(&dir)
        .env("GITHUB_REPOSITORY", "acme/widgets")
        .arg("sync")
        .output()
        .expect("failed to run binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("GITHUB_TOKEN environment variable not set"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_repository_exits_with_failure() {
    let dir = scratch_dir("issue_upsert_cli_bad_repo");
    let output = issue_upsert()
        .current_dir(&dir)
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_REPOSITORY", "widgets")
        .arg("sync")
        .output()
        .expect("failed to run binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Invalid GITHUB_REPOSITORY format"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn summary_without_warnings_exits_cleanly() {
    let dir = scratch_dir("issue_upsert_cli_clean_summary");
    let summary = dir.join("summary.txt");
    std::fs::write(&summary, "Refactoring scan results\n✅ src/main.cpp: OK\n").unwrap();

    let output = issue_upsert()
        .current_dir(&dir)
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_REPOSITORY", "acme/widgets")
        .args(["sync", "--summary"])
        .arg(&summary)
        .output()
        .expect("failed to run binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("No files with refactoring opportunities found"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_summary_file_exits_with_failure() {
    let dir = scratch_dir("issue_upsert_cli_missing_summary");
    let output = issue_upsert()
        .current_dir(&dir)
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_REPOSITORY", "acme/widgets")
        .args(["sync", "--summary", "does-not-exist.txt"])
        .output()
        .expect("failed to run binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Failed to read summary file"));
    let _ = std::fs::remove_dir_all(&dir);
}
