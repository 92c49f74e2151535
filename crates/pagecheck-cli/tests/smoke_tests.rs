//! Smoke tests for the pagecheck CLI
//!
//! Nothing here launches a browser: `run` is only exercised on paths that
//! fail before Chromium starts.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the pagecheck binary, isolated from the caller's env
fn pagecheck() -> Command {
    let mut cmd = Command::cargo_bin("pagecheck").expect("pagecheck binary should exist");
    cmd.env_remove("PREVIEW_URL")
        .env_remove("ACCESS_TOKEN")
        .env_remove("CHROMIUM_PATH")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    pagecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    pagecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_fails() {
    pagecheck().assert().failure();
}

#[test]
fn test_run_help_lists_flags() {
    pagecheck()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--access-token"))
        .stdout(predicate::str::contains("--implicit-wait-ms"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--junit"));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_shows_every_case() {
    pagecheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("homepage_title"))
        .stdout(predicate::str::contains("hamburger_menu_items"))
        .stdout(predicate::str::contains("mission_paragraph"));
}

#[test]
fn test_list_filter() {
    pagecheck()
        .args(["list", "--filter", "section_"])
        .assert()
        .success()
        .stdout(predicate::str::contains("section_7_render"))
        .stdout(predicate::str::contains("homepage_title").not());
}

#[test]
fn test_list_json_uses_base_url() {
    let output = pagecheck()
        .args(["list", "--json", "--url", "https://preview.example.app/"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let suite: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(suite["name"], "homepage");
    assert_eq!(suite["tests"].as_array().unwrap().len(), 27);
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("https://preview.example.app/_next/static/media/8by8-logo.a39d7aad.svg"));
}

#[test]
fn test_list_reads_preview_url_from_env() {
    let output = pagecheck()
        .env("PREVIEW_URL", "https://env.example.app")
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("https://env.example.app/_next/"));
}

// ============================================================================
// Run (configuration errors only)
// ============================================================================

#[test]
fn test_run_rejects_non_http_url() {
    pagecheck()
        .args(["run", "--url", "ftp://example.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_run_rejects_unparsable_url() {
    let dir = TempDir::new().unwrap();
    let junit = dir.path().join("junit.xml");
    pagecheck()
        .args(["run", "--url", "not a url", "--junit"])
        .arg(&junit)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
    assert!(!junit.exists());
}

#[test]
fn test_run_rejects_bad_wait() {
    pagecheck()
        .args(["run", "--implicit-wait-ms", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("implicit-wait-ms"));
}
