mod common;
use common::{init_db_with_data, rti, setup_test_db};
use predicates::prelude::*;
use predicates::str::contains;

/// `label:` followed by `value`, ignoring colour codes and padding.
fn line(label: &str, value: &str) -> impl Predicate<str> {
    predicate::str::is_match(format!(r"{label}:(\x1b\[[0-9;]*m)*\s+{value}\b")).unwrap()
}

#[test]
fn test_load_full_view_counts() {
    let db_path = setup_test_db("load_full_view");
    init_db_with_data(&db_path);

    rti()
        .args(["--db", &db_path, "load"])
        .assert()
        .success()
        .stdout(line("Loaded", "6"))
        .stdout(line("Dropped", "1"))
        .stdout(line("Normalized", "5"))
        .stdout(contains("Unique:").not());
}

#[test]
fn test_load_latest_unique_view() {
    let db_path = setup_test_db("load_latest_unique");
    init_db_with_data(&db_path);

    rti()
        .args(["--db", &db_path, "load", "--view", "latest-unique"])
        .assert()
        .success()
        .stdout(line("Unique", "4"));
}

#[test]
fn test_missing_database_means_no_data() {
    let db_path = setup_test_db("missing_database");

    rti()
        .args(["--db", &db_path, "report", "summary"])
        .assert()
        .success()
        .stdout(contains("No data available for the selected filters."))
        .stderr(contains("Error loading data"));

    assert!(!std::path::Path::new(&db_path).exists());
}

#[test]
fn test_summary_full_and_latest() {
    let db_path = setup_test_db("summary_views");
    init_db_with_data(&db_path);

    rti()
        .args(["--db", &db_path, "--quiet", "report", "summary"])
        .assert()
        .success()
        .stdout(line("Total applications", "5"))
        .stdout(contains("60.0%"));

    rti()
        .args([
            "--db",
            &db_path,
            "--quiet",
            "report",
            "summary",
            "--view",
            "latest-unique",
        ])
        .assert()
        .success()
        .stdout(line("Total applications", "4"))
        .stdout(contains("50.0%"));
}

#[test]
fn test_monthly_and_location_breakdowns() {
    let db_path = setup_test_db("monthly_location");
    init_db_with_data(&db_path);

    rti()
        .args(["--db", &db_path, "-q", "report", "monthly"])
        .assert()
        .success()
        .stdout(contains("2025-01"))
        .stdout(contains("2025-02"))
        .stdout(contains("Active %"));

    let out = rti()
        .args(["--db", &db_path, "-q", "report", "location"])
        .output()
        .expect("run report");
    let stdout = String::from_utf8_lossy(&out.stdout);
    let us = stdout.find("US").expect("US row");
    let fr = stdout.find("FR").expect("FR row");
    assert!(us < fr, "locations sorted by total: {stdout}");
}

#[test]
fn test_device_report_with_filters() {
    let db_path = setup_test_db("device_filters");
    init_db_with_data(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "-q",
            "report",
            "device-location",
            "--country",
            "DE",
            "--month",
            "jan,feb",
        ])
        .assert()
        .success()
        .stdout(contains("DE"))
        .stdout(contains("US").not());
}

#[test]
fn test_filters_with_no_match_show_empty_state() {
    let db_path = setup_test_db("empty_filters");
    init_db_with_data(&db_path);

    rti()
        .args(["--db", &db_path, "report", "daily", "--country", "ZZ"])
        .assert()
        .success()
        .stdout(contains("No data available for the selected filters."));
}

#[test]
fn test_inverted_date_range_is_an_error() {
    let db_path = setup_test_db("inverted_range");
    init_db_with_data(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "report",
            "summary",
            "--from",
            "2025-03-01",
            "--to",
            "2025-01-01",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid filter"));
}

#[test]
fn test_options_report() {
    let db_path = setup_test_db("options_report");
    init_db_with_data(&db_path);

    rti()
        .args(["--db", &db_path, "-q", "report", "options"])
        .assert()
        .success()
        .stdout(contains("January, February"))
        .stdout(contains("DE, FR, US"))
        .stdout(contains("Driver, Nurse"));
}
