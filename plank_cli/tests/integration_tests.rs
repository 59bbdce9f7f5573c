//! Integration tests for the plankflow binary.
//!
//! These tests verify end-to-end behavior including:
//! - Simulated workouts and their summaries
//! - Scripted pause, skip and abort
//! - Preferences persistence across runs

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from the user's config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plankflow"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

/// Run a simulated workout with JSON output and parse the report
fn simulate_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cli(dir)
        .args(["start", "--simulate", "--json"])
        .args(extra)
        .output()
        .expect("Failed to run plankflow");
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find("\n{").expect("no JSON report in output");
    serde_json::from_str(&stdout[start..]).expect("report is not valid JSON")
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Guided plank workout timer"));
}

#[test]
fn test_simulated_workout_completes() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["start", "--simulate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete"))
        .stdout(predicate::str::contains("Total plank time: 7:30"))
        .stdout(predicate::str::contains("Longest hold:     0:45"))
        .stdout(predicate::str::contains("prefs set --weight"));
}

#[test]
fn test_simulated_json_report() {
    let temp_dir = setup_test_dir();
    let report = simulate_json(temp_dir.path(), &[]);

    assert_eq!(report["summary"]["total_plank_ms"], 450_000);
    assert_eq!(report["summary"]["longest_hold_ms"], 45_000);
    assert!(report["summary"]["calories"].is_null());
    assert_eq!(report["session"]["segments"].as_array().unwrap().len(), 13);
}

#[test]
fn test_calories_shown_after_weight_set() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["prefs", "set", "--weight", "80"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["start", "--simulate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~30 kcal"));
}

#[test]
fn test_switch_prompt_shown_with_sound_off() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["prefs", "set", "--sound", "off", "--vibration", "off"])
        .assert()
        .success();

    let output = cli(temp_dir.path())
        .args(["start", "--simulate"])
        .output()
        .expect("Failed to run plankflow");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    // Three mirrored exercises in the default catalog
    assert_eq!(stdout.matches("Switch sides!").count(), 3);
}

#[test]
fn test_scripted_pause_does_not_count() {
    let temp_dir = setup_test_dir();
    let report = simulate_json(temp_dir.path(), &["--script", "15:p,25:p"]);
    assert_eq!(report["summary"]["total_plank_ms"], 450_000);
}

#[test]
fn test_scripted_skip_keeps_partial_hold() {
    let temp_dir = setup_test_dir();
    let report = simulate_json(temp_dir.path(), &["--script", "20:n"]);

    let segments = report["session"]["segments"].as_array().unwrap();
    assert_eq!(segments[0]["duration_ms"], 10_000);
    assert_eq!(report["summary"]["total_plank_ms"], 10_000 + 9 * 45_000);
}

#[test]
fn test_scripted_abort() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["start", "--simulate", "--script", "30:a,30:a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout aborted"))
        .stdout(predicate::str::contains("SESSION SUMMARY").not());
}

#[test]
fn test_bad_script_rejected() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["start", "--simulate", "--script", "5:z"])
        .assert()
        .failure();
}

#[test]
fn test_script_requires_simulate() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["start", "--script", "5:p"])
        .assert()
        .failure();
}

#[test]
fn test_level_and_time_scale_override() {
    let temp_dir = setup_test_dir();
    let report = simulate_json(temp_dir.path(), &["--level", "4", "--time-scale", "0.5"]);

    // 70s holds at half scale
    assert_eq!(report["summary"]["longest_hold_ms"], 35_000);
    assert_eq!(report["summary"]["total_plank_ms"], 350_000);
}

#[test]
fn test_invalid_level_rejected() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["start", "--simulate", "--level", "9"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_time_scale_rejected() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["start", "--simulate", "--time-scale", "0"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_defaults() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/plankflow");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[workout]\ndefault_level = 0\n",
    )
    .unwrap();

    let report = simulate_json(temp_dir.path(), &[]);
    assert_eq!(report["summary"]["longest_hold_ms"], 35_000);
}

#[test]
fn test_levels_table() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("levels")
        .assert()
        .success()
        .stdout(predicate::str::contains("Beginner"))
        .stdout(predicate::str::contains("*2     Intermediate"))
        .stdout(predicate::str::contains("Expert"));
}

#[test]
fn test_guide_lists_exercises() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("guide")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Simple Elbow Plank"))
        .stdout(predicate::str::contains("(both sides)"));
}

#[test]
fn test_prefs_roundtrip() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args([
            "prefs", "set", "--units", "imperial", "--weight", "176", "--sound", "off", "--theme",
            "light",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preferences saved"));

    assert!(temp_dir.path().join("data/preferences.json").exists());

    cli(temp_dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("176.0 lb"))
        .stdout(predicate::str::contains("Sound:     off"))
        .stdout(predicate::str::contains("Light"));
}

#[test]
fn test_prefs_clear_weight() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["prefs", "set", "--weight", "70"])
        .assert()
        .success();
    cli(temp_dir.path())
        .args(["prefs", "set", "--clear-weight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn test_prefs_rejects_bad_values() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["prefs", "set", "--weight=-5"])
        .assert()
        .failure();
    cli(temp_dir.path())
        .args(["prefs", "set", "--sound", "loud"])
        .assert()
        .failure();

    // Nothing was written by the failed updates
    assert!(!temp_dir.path().join("data/preferences.json").exists());
}
