//! Corruption recovery tests for plankflow.
//!
//! These tests verify the system can handle:
//! - Corrupted preferences files
//! - Empty and partial files
//! - A broken config file

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plankflow"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn write_preferences(dir: &Path, contents: &str) {
    let data_dir = dir.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("preferences.json"), contents).expect("Failed to write preferences");
}

#[test]
fn test_corrupted_preferences_file() {
    let temp_dir = setup_test_dir();
    write_preferences(temp_dir.path(), "{ invalid json }}}}");

    // Falls back to defaults: no weight, so no calories
    cli(temp_dir.path())
        .args(["start", "--simulate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete"))
        .stdout(predicate::str::contains("n/a"));
}

#[test]
fn test_empty_preferences_file() {
    let temp_dir = setup_test_dir();
    write_preferences(temp_dir.path(), "");

    cli(temp_dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight:    not set"));
}

#[test]
fn test_partial_preferences_file() {
    let temp_dir = setup_test_dir();
    write_preferences(temp_dir.path(), r#"{ "weight_kg": 80.0 }"#);

    cli(temp_dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("80.0 kg"))
        .stdout(predicate::str::contains("Sound:     on"));
}

#[test]
fn test_set_overwrites_corrupted_file() {
    let temp_dir = setup_test_dir();
    write_preferences(temp_dir.path(), "garbage");

    cli(temp_dir.path())
        .args(["prefs", "set", "--vibration", "off"])
        .assert()
        .success();

    let path = temp_dir.path().join("data/preferences.json");
    let contents = fs::read_to_string(&path).expect("Failed to read preferences");
    let parsed: serde_json::Value =
        serde_json::from_str(&contents).expect("preferences should be valid JSON again");
    assert_eq!(parsed["vibration_enabled"], false);
}

#[test]
fn test_broken_config_file_fails() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/plankflow");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[workout\ndefault_level = ").unwrap();

    cli(temp_dir.path()).arg("levels").assert().failure();
}
