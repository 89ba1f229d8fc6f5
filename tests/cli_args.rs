//! Integration tests for running the binary
//!
//! Every run points the cache at a temporary directory and clears the
//! Solcast variables, so no test touches the network or the user's cache.

use std::fs;
use std::process::{Command, Output};

use chrono::{TimeDelta, Utc};
use tempfile::TempDir;

const SOLCAST_VARS: [&str; 5] = [
    "SOLCAST_API_KEY",
    "SOLCAST_SITE_ID",
    "SOLCAST_BASE_URL",
    "SOLCAST_BATTERY_KWH",
    "SOLCAST_TIMEZONE",
];

/// Helper to run the CLI with given args and a clean Solcast environment
fn run_cli(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_solcast-daily"));
    for var in SOLCAST_VARS {
        command.env_remove(var);
    }
    command
        .env_remove("RUST_LOG")
        .envs(env.iter().copied())
        .args(args)
        .output()
        .expect("Failed to execute solcast-daily")
}

fn cache_arg(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

/// A forecast whose intervals all fall two days from now
fn future_forecast() -> String {
    let day = (Utc::now() + TimeDelta::days(2)).format("%Y-%m-%d");
    format!(
        r#"{{"forecasts": [
            {{"pv_estimate": 4.0, "pv_estimate90": 6.0, "period_end": "{day}T17:00:00.0000000Z", "period": "PT30M"}},
            {{"pv_estimate": 2.0, "pv_estimate90": 3.0, "period_end": "{day}T17:30:00.0000000Z"}}
        ]}}"#
    )
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], &[]);
    assert!(output.status.success(), "Expected --help to exit successfully");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("solcast-daily"), "Help should mention solcast-daily");
    assert!(stdout.contains("--battery-kwh"));
    assert!(stdout.contains("--refresh"));
}

#[test]
fn test_invalid_capacity_prints_error_and_exits() {
    let output = run_cli(&["--battery-kwh", "lots"], &[]);
    assert!(!output.status.success(), "Expected invalid capacity to fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid battery capacity"), "stderr: {stderr}");
}

#[test]
fn test_missing_site_id_without_cache_exits_with_code_1() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(
        &["--cache-dir", &cache_arg(&dir)],
        &[("SOLCAST_API_KEY", "key"), ("SOLCAST_BASE_URL", "http://127.0.0.1:9")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "No report should be printed");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Could not fetch Solcast forecast and no cache exists."));
    assert!(stderr.contains("SOLCAST_SITE_ID"));
}

#[test]
fn test_same_day_cache_prints_report_without_credentials() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("forecast.json"), future_forecast()).unwrap();

    let output = run_cli(
        &["--cache-dir", &cache_arg(&dir), "--timezone", "America/Chicago"],
        &[("SOLCAST_BATTERY_KWH", "10")],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines[0], "Solcast PV energy forecast (kWh):");
    assert_eq!(lines[1], "  Day          Mean    Optimistic   (% of 10 kWh)");
    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with(":    3.00      4.50    ( 45.0%)"), "row: {}", lines[2]);
}

#[test]
fn test_battery_flag_overrides_environment() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("forecast.json"), future_forecast()).unwrap();

    let output = run_cli(
        &["--cache-dir", &cache_arg(&dir), "--battery-kwh", "20"],
        &[("SOLCAST_BATTERY_KWH", "10")],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(% of 20 kWh)"));
    assert!(stdout.contains("( 22.5%)"));
}

#[test]
fn test_empty_forecast_exits_successfully() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("forecast.json"), r#"{"forecasts": []}"#).unwrap();

    let output = run_cli(&["--cache-dir", &cache_arg(&dir)], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "No forecast data found.\n");
}
