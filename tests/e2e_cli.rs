//! CLI end-to-end tests
//!
//! Tests for the segcat command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the segcat binary
#[allow(deprecated)]
fn segcat_cmd() -> Command {
    Command::cargo_bin("segcat").unwrap()
}

fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    segcat_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    segcat_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("segcat "));
}

#[test]
fn test_cli_inspect_seekable_script() {
    let dir = tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "list.ffconcat",
        "ffconcat version 1.0\nfile a.mp4\nduration 10\nfile b.mp4\nduration 5\n",
    );

    segcat_cmd()
        .arg("inspect")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Segments: 2"))
        .stdout(predicate::str::contains("Seekable: yes"))
        .stdout(predicate::str::contains("Duration: 0:00:15.000000"))
        .stdout(predicate::str::contains("b.mp4  start 0:00:10.000000"));
}

#[test]
fn test_cli_inspect_json() {
    let dir = tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "list.txt",
        "file a.mp4\nduration 10\nfile b.mp4\nduration 5\nfile c.mp4\n",
    );

    let output = segcat_cmd()
        .args(["inspect", "--json"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["seekable"], false);
    assert!(json["total_duration"].is_null());
    assert_eq!(json["segments"][2]["start_time"], 15_000_000);
    assert!(json["segments"][2]["duration"].is_null());
}

#[test]
fn test_cli_inspect_unsafe_path() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "list.txt", "file ../../etc/passwd\n");

    segcat_cmd()
        .args(["inspect", "--safe", "enabled"])
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe file name '../../etc/passwd'"));

    segcat_cmd()
        .args(["inspect", "--safe", "disabled"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Segments: 1"));
}

#[test]
fn test_cli_inspect_reports_line() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "list.txt", "file a.mp4\nchapter 1\n");

    segcat_cmd()
        .arg("inspect")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 2: unknown keyword 'chapter'"));
}

#[test]
fn test_cli_inspect_missing_script() {
    segcat_cmd()
        .args(["inspect", "/nonexistent/list.ffconcat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_safe_mode_from_config() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "list.txt", "file /etc/hostname\n");
    let config = write_script(dir.path(), "segcat.toml", "[concat]\nsafe = \"enabled\"\n");

    segcat_cmd()
        .arg("--config")
        .arg(&config)
        .arg("inspect")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe file name"));
}

#[test]
fn test_cli_probe() {
    let dir = tempdir().unwrap();
    let good = write_script(dir.path(), "good", "ffconcat version 1.0\nfile a.ts\n");
    let bad = write_script(dir.path(), "bad", "file a.ts\n");

    segcat_cmd()
        .arg("probe")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("score 100"));

    segcat_cmd()
        .arg("probe")
        .arg(&bad)
        .assert()
        .success()
        .stdout(predicate::str::contains("score 0"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config = write_script(
        dir.path(),
        "segcat.toml",
        "[concat]\nsafe = 0\ntimeout_us = 5000000\n",
    );

    segcat_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Safe mode: disabled"))
        .stdout(predicate::str::contains("Timeout: 5000000 us"))
        .stdout(predicate::str::contains("Warning: Safe mode is disabled").count(1))
        .stderr(predicate::str::contains("Safe mode is disabled").not());
}

#[test]
fn test_cli_validate_rejects_bad_config() {
    let dir = tempdir().unwrap();
    let config = write_script(dir.path(), "segcat.toml", "[concat]\ntimeout_us = 0\n");

    segcat_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_us cannot be 0"));
}

#[test]
fn test_cli_validate_without_config() {
    segcat_cmd()
        .arg("validate")
        .current_dir(tempdir().unwrap().path())
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"));
}
