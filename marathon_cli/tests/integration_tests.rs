//! Integration tests for the marathon binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging, listing and deleting sessions
//! - Settings changes flowing into the plan
//! - Progress figures on the status screen
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any user config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("marathon"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

/// Start a plan on Monday 2024-01-01 with the default volume
fn start_plan(data_dir: &Path) {
    cli(data_dir)
        .args(["--today", "2024-01-01", "settings", "--start", "2024-01-01", "--base", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings updated"));
}

fn read_state(data_dir: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(data_dir.join("state/local.json")).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("marathon"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("24-week marathon training planner"));
}

#[test]
fn test_status_without_state_uses_defaults() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["--today", "2024-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan started 2024-01-10 · week 1 of 24"))
        .stdout(predicate::str::contains("Completion:       0%"));

    // Reading never creates a record
    assert!(!data_dir.join("state/local.json").exists());
}

#[test]
fn test_log_then_list() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args([
            "log", "--date", "2024-01-02", "--km", "5", "--time", "25:00", "--note", " easy jog ",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Session logged: 5 km on 2024-01-02 (25:00, 5:00/km)"));

    cli(data_dir)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-02"))
        .stdout(predicate::str::contains("5:00/km"))
        .stdout(predicate::str::contains("easy jog"));

    let state = read_state(data_dir);
    assert_eq!(state["version"], 1);
    assert_eq!(state["logsByDate"]["2024-01-02"]["distanceKm"], 5.0);
    assert_eq!(state["logsByDate"]["2024-01-02"]["timeSeconds"], 1500);
    assert_eq!(state["logsByDate"]["2024-01-02"]["note"], "easy jog");
}

#[test]
fn test_log_same_date_replaces_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--km", "5", "--time", "25:00"])
        .assert()
        .success();

    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--km", "6.04", "--time", "0:33:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Updated session: 6 km on 2024-01-02"));

    let state = read_state(data_dir);
    let logs = state["logsByDate"].as_object().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs["2024-01-02"]["distanceKm"], 6.0);
    assert_eq!(logs["2024-01-02"]["timeSeconds"], 1980);
}

#[test]
fn test_log_defaults_to_planned_distance() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--time", "15:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Session logged: 2.5 km on 2024-01-02 (15:00, 6:00/km)"));

    // Rest days and dates outside the plan need an explicit distance
    cli(data_dir)
        .args(["log", "--date", "2024-01-03", "--time", "15:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rest day"));

    cli(data_dir)
        .args(["log", "--date", "2024-07-01", "--time", "15:00"])
        .assert()
        .failure();

    let state = read_state(data_dir);
    let logs = state["logsByDate"].as_object().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs["2024-01-02"]["distanceKm"], 2.5);
    assert_eq!(logs["2024-01-02"]["timeSeconds"], 900);
}

#[test]
fn test_invalid_log_is_rejected_without_saving() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for (km, time) in [("abc", "25:00"), ("0", "25:00"), ("-4", "25:00"), ("5", "0:00"), ("5", "x")] {
        cli(data_dir)
            .args(["--today", "2024-01-02", "log", "--km", km, "--time", time])
            .assert()
            .failure();
    }

    cli(data_dir)
        .args(["log", "--date", "2024/01/02", "--km", "5", "--time", "25:00"])
        .assert()
        .failure();

    assert!(!data_dir.join("state/local.json").exists());
}

#[test]
fn test_delete_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-04", "--km", "3.1", "--time", "20:00"])
        .assert()
        .success();

    cli(data_dir)
        .args(["delete", "--date", "2024-01-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Deleted session on 2024-01-04"));

    cli(data_dir)
        .args(["delete", "--date", "2024-01-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No session logged on 2024-01-04"));

    cli(data_dir)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions logged yet"));
}

#[test]
fn test_status_reports_progress() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--km", "5", "--time", "30:00"])
        .assert()
        .success();

    // Planned through Thursday of week 1: 2.5 + 3.1
    cli(data_dir)
        .args(["--today", "2024-01-04"])
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("week 1 of 24"))
        .stdout(predicate::str::contains("Planned to date:  5.6 km"))
        .stdout(predicate::str::contains("Actual to date:   5 km"))
        .stdout(predicate::str::contains("Completion:       89%"))
        .stdout(predicate::str::contains("2024-01-04 Thu · Tempo · 3.1 km"));
}

#[test]
fn test_status_after_plan_end() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["--today", "2024-07-01", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finished"))
        .stdout(predicate::str::contains("No workouts left"));
}

#[test]
fn test_plan_week_view() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["plan", "--week", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1 (2024-01-01 – 2024-01-07) · target 15.6 km"))
        .stdout(predicate::str::contains("this week").not())
        .stdout(predicate::str::contains("Long run"))
        .stdout(predicate::str::contains("RPE 3–4 (conversational)"));

    cli(data_dir)
        .args(["--today", "2024-01-03", "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1 (2024-01-01 – 2024-01-07) · target 15.6 km · this week"));

    cli(data_dir)
        .args(["plan", "--week", "24"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42.2 km"));

    cli(data_dir)
        .args(["plan", "--week", "25"])
        .assert()
        .failure();
}

#[test]
fn test_settings_change_regenerates_plan() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["settings", "--easy-pace", "6.5", "--tempo-pace", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Easy pace:         6:30/km"));

    cli(data_dir)
        .args(["plan", "--week", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Easy 6:00–7:00/km"))
        .stdout(predicate::str::contains("Tempo 4:40–5:20/km"))
        .stdout(predicate::str::contains("Easy 5:50–7:10/km (slower)"));

    cli(data_dir)
        .args(["settings", "--clear-easy-pace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Easy pace:         not set"));

    let state = read_state(data_dir);
    assert!(state["settings"].get("easyPaceMinPerKm").is_none());
    assert_eq!(state["settings"]["tempoPaceMinPerKm"], 5.0);
}

#[test]
fn test_invalid_settings_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["settings", "--easy-pace", "0"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["settings", "--base", "-5"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["settings", "--easy-pace", "6", "--clear-easy-pace"])
        .assert()
        .failure();

    let state = read_state(data_dir);
    assert_eq!(state["settings"]["baseWeeklyKm"], 10.0);
    assert!(state["settings"].get("easyPaceMinPerKm").is_none());
}

#[test]
fn test_progress_series() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-07", "--km", "6", "--time", "40:00"])
        .assert()
        .success();

    cli(data_dir)
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("W1"))
        .stdout(predicate::str::contains("W24"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--km", "5.5", "--time", "27:30", "--note", "hills"])
        .assert()
        .success();

    let plan_path = data_dir.join("out/plan.csv");
    let logs_path = data_dir.join("out/logs.csv");

    cli(data_dir)
        .arg("export")
        .arg("--plan")
        .arg(&plan_path)
        .arg("--logs")
        .arg(&logs_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Exported 168 plan days"))
        .stdout(predicate::str::contains("✓ Exported 1 sessions"));

    let plan_csv = fs::read_to_string(&plan_path).unwrap();
    assert!(plan_csv.starts_with("week,date,day,type,planned_km,pace_hint\n"));
    assert_eq!(plan_csv.lines().count(), 169);

    let logs_csv = fs::read_to_string(&logs_path).unwrap();
    assert!(logs_csv.contains("2024-01-02,5.5,1650,5:00/km,hills"));
}

#[test]
fn test_export_requires_target() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path()).arg("export").assert().failure();
}

#[test]
fn test_reset_requires_confirmation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    start_plan(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--km", "5", "--time", "25:00"])
        .assert()
        .success();

    cli(data_dir).arg("reset").assert().failure();
    assert_eq!(read_state(data_dir)["logsByDate"].as_object().unwrap().len(), 1);

    cli(data_dir)
        .args(["--today", "2024-03-04", "reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ All data reset to defaults"));

    let state = read_state(data_dir);
    assert!(state["logsByDate"].as_object().unwrap().is_empty());
    assert_eq!(state["settings"]["planStartDate"], "2024-03-04");
}

#[test]
fn test_users_are_isolated() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["--user", "alice", "log", "--date", "2024-01-02", "--km", "5", "--time", "25:00"])
        .assert()
        .success();

    assert!(data_dir.join("state/alice.json").exists());

    cli(data_dir)
        .args(["--user", "bob", "logs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions logged yet"));

    cli(data_dir)
        .args(["--user", "../etc", "logs"])
        .assert()
        .failure();
}
