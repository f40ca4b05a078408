//! Integration tests for the `pitch` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the seed, check,
//! and free subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn pitch() -> Command {
    Command::cargo_bin("pitch").unwrap()
}

/// Run `pitch seed` with a fixed seed and anchor date and return stdout.
fn seeded_schedule(count: &str, seed: &str) -> String {
    let output = pitch()
        .args(["seed", "--count", count, "--seed", seed, "--today", "2025-06-01"])
        .output()
        .expect("pitch seed should run");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("stdout should be UTF-8")
}

// ─────────────────────────────────────────────────────────────────────────────
// Seed subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn seed_prints_json_array() {
    let stdout = seeded_schedule("20", "42");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    let bookings = value.as_array().expect("top-level array");
    assert!(!bookings.is_empty());
    assert!(bookings.len() <= 20);
    assert!(bookings[0].get("fieldId").is_some());
    assert!(bookings[0].get("startHour").is_some());
}

#[test]
fn seed_is_reproducible_with_fixed_seed() {
    assert_eq!(seeded_schedule("30", "7"), seeded_schedule("30", "7"));
}

#[test]
fn seed_reports_summary_on_stderr() {
    pitch()
        .args(["seed", "--count", "5", "--seed", "1", "--today", "2025-06-01"])
        .assert()
        .success()
        .stderr(predicate::str::contains("of 5 bookings"))
        .stderr(predicate::str::contains("seed 1"));
}

#[test]
fn seeded_schedule_passes_check() {
    let schedule = seeded_schedule("150", "2024");

    pitch()
        .arg("check")
        .write_stdin(schedule)
        .assert()
        .success()
        .stdout(predicate::str::contains("No conflicts"));
}

#[test]
fn seed_with_policy_and_fields_files_under_fills() {
    // One field, one evening, five 1-hour slots: 10 requested, at most 5 fit.
    let output = pitch()
        .args([
            "seed",
            "--count",
            "10",
            "--seed",
            "3",
            "--today",
            "2025-06-01",
            "--fields",
            &fixture("single_field.json"),
            "--policy",
            &fixture("one_evening_policy.json"),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let bookings: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(bookings.len() <= 5);
    assert!(bookings.iter().all(|b| b["fieldId"] == "R1"));
    assert!(bookings.iter().all(|b| b["date"] == "2025-06-01"));
}

#[test]
fn seed_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bookings.json");

    pitch()
        .args(["seed", "--count", "12", "--seed", "9", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    let bookings: Vec<serde_json::Value> = serde_json::from_str(&written).unwrap();
    assert!(bookings.len() <= 12);
}

#[test]
fn seed_with_empty_field_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    let fields = dir.path().join("fields.json");
    std::fs::write(&fields, "[]").unwrap();

    pitch()
        .args(["seed", "--fields"])
        .arg(&fields)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn seed_with_invalid_policy_fails() {
    let dir = tempfile::tempdir().unwrap();
    let policy = dir.path().join("policy.json");
    std::fs::write(&policy, r#"{"durations": []}"#).unwrap();

    pitch()
        .args(["seed", "--policy"])
        .arg(&policy)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid synthesis policy"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_clean_file_succeeds() {
    pitch()
        .args(["check", "-i", &fixture("clean.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conflicts among 3 bookings"));
}

#[test]
fn check_reports_overlap_and_fails() {
    pitch()
        .args(["check", "-i", &fixture("conflicting.json")])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "BK-1 <-> BK-2 on FLD-1 2025-06-01 (1h overlap)",
        ))
        .stdout(predicate::str::contains("BK-3").not())
        .stderr(predicate::str::contains("1 conflicting pair(s) among 3 bookings"));
}

#[test]
fn check_rejects_malformed_json() {
    pitch()
        .arg("check")
        .write_stdin("[{\"id\": 1}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse bookings JSON"));
}

#[test]
fn check_missing_file_fails() {
    pitch()
        .args(["check", "-i", "/nonexistent/bookings.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Free subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn free_lists_gaps_around_bookings() {
    // FLD-1 is busy 17-21 on Sunday 2025-06-01, open 08-22
    pitch()
        .args([
            "free",
            "--field",
            "FLD-1",
            "--date",
            "2025-06-01",
            "-i",
            &fixture("clean.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00-17:00 (9h)"))
        .stdout(predicate::str::contains("21:00-22:00 (1h)"));
}

#[test]
fn free_with_min_hours_prints_first_fit_only() {
    pitch()
        .args([
            "free",
            "--field",
            "FLD-2",
            "--date",
            "2025-06-01",
            "--min-hours",
            "3",
            "-i",
            &fixture("clean.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00-17:00 (9h)"))
        .stdout(predicate::str::contains("19:00").not());
}

#[test]
fn free_on_closed_day_says_so() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("venue.json");
    let mut venue: serde_json::Value = serde_json::json!({
        "name": "Test Arena",
        "workingHours": {
            "monday": {"open": 8, "close": 22},
            "tuesday": {"open": 8, "close": 22},
            "wednesday": {"open": 8, "close": 22},
            "thursday": {"open": 8, "close": 22},
            "friday": {"open": 8, "close": 23},
            "saturday": {"open": 8, "close": 23},
            "sunday": {"open": 8, "close": 22}
        }
    });
    venue["workingHours"]["sunday"]["closed"] = serde_json::Value::Bool(true);
    std::fs::write(&settings, venue.to_string()).unwrap();

    pitch()
        .args(["free", "--field", "FLD-1", "--date", "2025-06-01", "--settings"])
        .arg(&settings)
        .args(["-i", &fixture("clean.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Arena is closed on 2025-06-01"));
}

#[test]
fn free_rejects_bad_date() {
    pitch()
        .args(["free", "--field", "FLD-1", "--date", "June 1st"])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    pitch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("free"));
}

#[test]
fn version_flag() {
    pitch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pitch"));
}
