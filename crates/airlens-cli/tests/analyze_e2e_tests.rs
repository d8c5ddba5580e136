//! End-to-end tests for the airlens analyze command
//!
//! These tests validate the full analyze workflow including:
//! - File and stdin dataset sources
//! - The fifteen-chart battery and its fixed artifact names
//! - Overwrite semantics of the output directory
//! - Cleaning summary output
//! - Error handling (missing file, missing column)

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "First Name,Gender,Age,Nationality,Airport Name,Airport Country Code,Airport Continent,Pilot Name,Flight Status,Departure Date";

const CHART_FILES: [&str; 15] = [
    "gender_distribution.png",
    "age_distribution.png",
    "flight_status.png",
    "status_by_continent.png",
    "top_nationalities.png",
    "top_departure_airports.png",
    "status_by_gender.png",
    "avg_age_by_status.png",
    "top_country_codes.png",
    "heatmap_gender_continent.png",
    "top_pilots.png",
    "monthly_flight_trend.png",
    "weekday_status.png",
    "nationality_gender.png",
    "flight_status_pie.png",
];

/// Helper to build a CSV with the standard header
fn csv_with_rows(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out
}

fn sample_csv() -> String {
    csv_with_rows(&[
        "Alan,Male,30,Brazil,GRU,BR,South America,Marco Silva,On Time,2023-01-05",
        "Bea,Female,25,Japan,HND,JP,Asia,Yuki Tanaka,Delayed,2023-01-20",
        "Cem,Male,,Turkey,IST,TR,Europe,Emre Demir,On Time,2023-01-25",
    ])
}

fn airlens() -> Command {
    let mut cmd = Command::cargo_bin("airlens").expect("binary builds");
    // Keep tests independent of the caller's environment
    cmd.env_remove("AIRLENS_DATA_PATH")
        .env_remove("AIRLENS_PLOTS_DIR")
        .env_remove("AIRLENS_USERS_DB");
    cmd
}

fn assert_battery_written(dir: &Path) {
    for file in CHART_FILES {
        let path = dir.join(file);
        assert!(path.exists(), "missing artifact {}", file);
        assert!(
            std::fs::metadata(&path).expect("artifact metadata").len() > 0,
            "empty artifact {}",
            file
        );
    }
}

#[test]
fn test_analyze_file_renders_full_battery() {
    let dir = TempDir::new().expect("temp dir");
    let csv_path = dir.path().join("passengers.csv");
    std::fs::write(&csv_path, sample_csv()).expect("write fixture");
    let plots = dir.path().join("plots");

    airlens()
        .arg("analyze")
        .arg("--data")
        .arg(&csv_path)
        .arg("--out")
        .arg(&plots)
        .assert()
        .success()
        .stdout(predicate::str::contains("kept 2 of 3 rows"))
        .stdout(predicate::str::contains("Rendered 15 charts"))
        .stdout(predicate::str::contains("gender_distribution.png"))
        .stdout(predicate::str::contains("flight_status_pie.png"));

    assert_battery_written(&plots);
}

#[test]
fn test_analyze_stdin_source() {
    let dir = TempDir::new().expect("temp dir");
    let plots = dir.path().join("plots");

    airlens()
        .arg("analyze")
        .arg("--stdin")
        .arg("--out")
        .arg(&plots)
        .write_stdin(sample_csv())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 15 charts"));

    assert_battery_written(&plots);
}

#[test]
fn test_analyze_headers_only_degrades_to_placeholders() {
    let dir = TempDir::new().expect("temp dir");
    let plots = dir.path().join("plots");

    airlens()
        .arg("analyze")
        .arg("--stdin")
        .arg("--out")
        .arg(&plots)
        .write_stdin(csv_with_rows(&[]))
        .assert()
        .success()
        .stdout(predicate::str::contains("kept 0 of 0 rows"))
        .stdout(predicate::str::contains("Rendered 15 charts"));

    assert_battery_written(&plots);
}

#[test]
fn test_analyze_overwrites_previous_artifacts() {
    let dir = TempDir::new().expect("temp dir");
    let plots = dir.path().join("plots");

    for _ in 0..2 {
        airlens()
            .arg("analyze")
            .arg("--stdin")
            .arg("--out")
            .arg(&plots)
            .write_stdin(sample_csv())
            .assert()
            .success();
    }

    // Still exactly one artifact per chart name
    let pngs = std::fs::read_dir(&plots)
        .expect("read plots dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().map(|ext| ext == "png").unwrap_or(false))
        .count();
    assert_eq!(pngs, CHART_FILES.len());
}

#[test]
fn test_analyze_missing_file_fails() {
    let dir = TempDir::new().expect("temp dir");

    airlens()
        .arg("analyze")
        .arg("--data")
        .arg(dir.path().join("does-not-exist.csv"))
        .arg("--out")
        .arg(dir.path().join("plots"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_analyze_missing_column_names_it() {
    let dir = TempDir::new().expect("temp dir");

    airlens()
        .arg("analyze")
        .arg("--stdin")
        .arg("--out")
        .arg(dir.path().join("plots"))
        .write_stdin("Gender,Age\nMale,30\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column"))
        .stderr(predicate::str::contains("Nationality"));
}

#[test]
fn test_analyze_rejects_data_with_stdin() {
    airlens()
        .arg("analyze")
        .arg("--stdin")
        .arg("--data")
        .arg("whatever.csv")
        .assert()
        .failure();
}
