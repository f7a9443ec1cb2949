//! End-to-end CLI tests against the simulated backend.

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use std::path::PathBuf;

fn cmd() -> Command {
    Command::cargo_bin("rover_cli").expect("binary built")
}

fn write_temp_config(body: &str) -> PathBuf {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("rover_test_cfg_{}.toml", std::process::id()));
    std::fs::write(&path, body).expect("write temp config");
    path
}

#[rstest]
fn missing_arguments_prints_usage() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[rstest]
fn self_check_reports_ok_on_simulated_backend() {
    cmd()
        .arg("self-check")
        .assert()
        .success()
        .stdout(predicate::str::contains("self-check: ok (simulated)"));
}

#[rstest]
fn self_check_json_is_structured() {
    let out = cmd()
        .arg("--json")
        .arg("self-check")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(out).expect("utf8");
    let v: serde_json::Value = serde_json::from_str(line.trim()).expect("valid JSON");
    assert_eq!(v["status"], "ok");
    assert_eq!(v["backend"], "simulated");
}

#[rstest]
fn invalid_config_exits_with_code_two() {
    let cfg = write_temp_config(
        r#"
        [control]
        tick_rate_hz = 0
        "#,
    );
    cmd()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("onfiguration"));
    let _ = std::fs::remove_file(cfg);
}

#[rstest]
fn malformed_toml_exits_with_code_two() {
    let cfg = write_temp_config("this is not toml = [");
    cmd()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .failure()
        .code(2);
    let _ = std::fs::remove_file(cfg);
}

#[rstest]
fn drive_parks_and_exits_cleanly_on_stdin_eof() {
    cmd()
        .arg("drive")
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success();
}

#[rstest]
fn drive_applies_frames_then_exits_on_eof() {
    cmd()
        .args(["--log-level", "debug", "drive"])
        .write_stdin("a\nc\n")
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stderr(predicate::str::contains("command received"));
}

#[rstest]
fn drive_accepts_heading_and_overrides() {
    cmd()
        .args(["drive", "--heading", "right", "--target-mps", "0.2"])
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success();
}
