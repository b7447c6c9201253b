mod common;
use common::{csv_line, rti, setup_test_db, temp_out, write_csv};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

#[test]
fn test_ingest_then_report() {
    let db_path = setup_test_db("ingest_then_report");
    let failures = temp_out("ingest_then_report_failures", "csv");
    let csv = write_csv(
        "ingest_then_report",
        &[
            csv_line("1", "2025-03-01", "10", "active"),
            csv_line("2", "2025-03-02", "10", "disabled"),
            csv_line("3", "2025-03-03", "11", "active"),
        ],
    );

    rti()
        .args([
            "--db",
            &db_path,
            "ingest",
            "--file",
            &csv,
            "--failures",
            &failures,
        ])
        .assert()
        .success()
        .stdout(contains("inserted=3"));

    assert!(!std::path::Path::new(&failures).exists());

    rti()
        .args([
            "--db",
            &db_path,
            "-q",
            "report",
            "summary",
            "--view",
            "latest-unique",
        ])
        .assert()
        .success()
        .stdout(contains("50.0%"));

    rti()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("ingest"))
        .stdout(contains("migration_applied"));
}

#[test]
fn test_ingest_logs_invalid_rows() {
    let db_path = setup_test_db("ingest_invalid_rows");
    let failures = temp_out("ingest_invalid_rows_failures", "csv");
    let csv = write_csv(
        "ingest_invalid_rows",
        &[
            csv_line("1", "2025-03-01", "10", "active"),
            csv_line("", "2025-03-02", "11", "active"),
            csv_line("3", "03/03/2025", "12", "active"),
        ],
    );

    rti()
        .args([
            "--db",
            &db_path,
            "ingest",
            "--file",
            &csv,
            "--failures",
            &failures,
        ])
        .assert()
        .success()
        .stdout(contains("row_failures=2"))
        .stderr(contains("ID cannot be empty."));

    let log = fs::read_to_string(&failures).expect("failure log");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines[0], "row,error,data");
    assert!(lines[1].starts_with("2,ID cannot be empty."));
    assert!(lines[2].starts_with("3,Type mismatch"));
}

#[test]
fn test_ingest_missing_columns_is_fatal() {
    let db_path = setup_test_db("ingest_missing_cols");
    let csv = temp_out("ingest_missing_cols", "csv");
    fs::write(&csv, "id,dateUTC,userID\n1,2025-03-01,10\n").unwrap();

    rti()
        .args(["--db", &db_path, "ingest", "--file", &csv])
        .assert()
        .failure()
        .stderr(contains("required columns missing"))
        .stderr(contains("deviceType"))
        .stderr(contains("row_num").not());
}

#[test]
fn test_ingest_missing_file() {
    let db_path = setup_test_db("ingest_missing_file");

    rti()
        .args(["--db", &db_path, "ingest", "--file", "/no/such/file.csv"])
        .assert()
        .failure()
        .stderr(contains("CSV file not found"));
}
