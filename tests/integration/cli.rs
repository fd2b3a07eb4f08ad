//! Integration tests for the nollmit binary.
//!
//! Every test runs in its own temp directory so the usage record and any
//! `nollmit.toml` stay isolated.

use assert_cmd::Command;
use chrono::Local;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

/// Get a Command instance for the nollmit binary
#[allow(deprecated)]
fn nollmit_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nollmit").expect("Failed to find nollmit binary");
    cmd.current_dir(dir.path())
        .env_remove("NOLLMIT_USAGE__STORAGE_PATH")
        .env("RUST_LOG", "off");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should be JSON")
}

/// A usage record for the current month and day.
fn seed_usage(path: &std::path::Path) {
    let now = Local::now();
    let stats = json!({
        "month": now.format("%Y-%m").to_string(),
        "monthly_requests": 7,
        "estimated_input_tokens": 1000,
        "estimated_output_tokens": 200,
        "date": now.format("%Y-%m-%d").to_string(),
        "daily_requests": 3,
        "first_request": null,
        "last_request": null
    });
    fs::write(path, stats.to_string()).expect("Failed to seed usage record");
}

#[test]
fn test_parse_labeled_reply() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = nollmit_cmd(&temp_dir)
        .arg("parse")
        .arg("ACTION: raise\nAMOUNT: 300\nREASON: Top pair, good kicker.")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let decision = stdout_json(&output);
    assert_eq!(decision["action"], "RAISE");
    assert_eq!(decision["amount"], 300);
    assert_eq!(decision["reason"], "Top pair, good kicker.");
}

#[test]
fn test_parse_reads_stdin() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = nollmit_cmd(&temp_dir)
        .arg("parse")
        .write_stdin("BET: 50\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let decision = stdout_json(&output);
    assert_eq!(decision["action"], "RAISE");
    assert_eq!(decision["amount"], 50);
}

#[test]
fn test_parse_garbage_folds() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    nollmit_cmd(&temp_dir)
        .arg("parse")
        .arg("I'm not sure what to do here.")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"FOLD\""));
}

#[test]
fn test_usage_json_reads_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    seed_usage(&temp_dir.path().join(".usage_stats.json"));

    let output = nollmit_cmd(&temp_dir)
        .arg("usage")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary = stdout_json(&output);
    assert_eq!(summary["monthly_requests"], 7);
    assert_eq!(summary["daily_requests"], 3);
    assert_eq!(summary["estimated_total_tokens"], 1200);
    assert_eq!(summary["limits"]["free"]["tokens_remaining"], 98_800);
    assert_eq!(summary["limits"]["free"]["daily_requests_remaining"], 997);
}

#[test]
fn test_usage_text_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    seed_usage(&temp_dir.path().join(".usage_stats.json"));

    nollmit_cmd(&temp_dir)
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage Summary"))
        .stdout(predicate::str::contains("7 requests"));
}

#[test]
fn test_reset_usage_clears_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let record = temp_dir.path().join(".usage_stats.json");
    seed_usage(&record);

    nollmit_cmd(&temp_dir)
        .arg("reset-usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset"));

    let stored: Value =
        serde_json::from_str(&fs::read_to_string(&record).expect("record should exist"))
            .expect("record should be JSON");
    assert_eq!(stored["monthly_requests"], 0);
    assert_eq!(stored["daily_requests"], 0);
    assert_eq!(stored["estimated_input_tokens"], 0);
}

#[test]
fn test_storage_path_from_env() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let record = temp_dir.path().join("state").join("usage.json");

    nollmit_cmd(&temp_dir)
        .env("NOLLMIT_USAGE__STORAGE_PATH", &record)
        .arg("reset-usage")
        .assert()
        .success();

    assert!(record.exists());
}

#[test]
fn test_storage_path_from_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[usage]\nstorage_path = \"custom_usage.json\"\n")
        .expect("Failed to write config");

    nollmit_cmd(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("reset-usage")
        .assert()
        .success();

    assert!(temp_dir.path().join("custom_usage.json").exists());
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    nollmit_cmd(&temp_dir)
        .arg("--config")
        .arg("absent.toml")
        .arg("usage")
        .assert()
        .failure();
}

#[test]
fn test_models_lists_overrides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("nollmit.toml"),
        "[[models]]\nplayer = \"Qwen 2.5\"\nmodel = \"Qwen/Qwen2.5-72B-Instruct\"\n",
    )
    .expect("Failed to write config");

    nollmit_cmd(&temp_dir)
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Qwen/Qwen2.5-72B-Instruct"))
        .stdout(predicate::str::contains("meta-llama/Llama-3.1-8B-Instruct"));
}
