#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rusqlite::{Connection, params};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, isolated from the developer's home and environment.
pub fn rti() -> Command {
    let home = env::temp_dir().join("jobinsight_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("jobinsight");
    cmd.env("HOME", &home);
    for var in [
        "SQL_HOST",
        "SQL_PORT",
        "SQL_USER",
        "SQL_PASSWORD",
        "SQL_DATABASE",
        "SQL_TABLE_NAME",
        "SQL_ROW_CAP",
        "CONFIG_STORE_URI",
        "CONFIG_STORE_COLLECTION",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_jobinsight.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// (id, dateUTC, userID, status, countryCode, deviceType, registerSource, title)
pub const FIXTURE: [(i64, &str, i64, &str, &str, &str, &str, &str); 6] = [
    (1, "2025-01-05", 100, "active", "US", "mobile", "organic", "Nurse"),
    (2, "2025-01-05", 101, "disabled", "US", "desktop", "organic", "Driver"),
    (3, "2025-01-20", 100, "disabled", "DE", "mobile", "referral", "Nurse"),
    (4, "2025-02-03", 102, "active", "DE", "desktop", "organic", "Nurse"),
    (5, "2025-02-11 08:15:00", 103, "Active", "FR", "mobile", "referral", "Driver"),
    (6, "not-a-date", 104, "active", "US", "mobile", "organic", "Nurse"),
];

/// Create the schema through the library migrations and insert the fixture.
pub fn init_db_with_data(db_path: &str) {
    let conn = Connection::open(db_path).expect("open db");
    jobinsight::db::migrate::run_pending_migrations(&conn, "jobseeker_data").expect("migrate");

    for (id, date, user, status, country, device, source, title) in FIXTURE {
        conn.execute(
            "INSERT INTO jobseeker_data
                (id, dateUTC, userID, status, countryCode, deviceType, registerSource, title, userEmail)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![id, date, user, status, country, device, source, title, format!("u{user}@example.com")],
        )
        .expect("insert fixture row");
    }
}

pub const CSV_HEADER: &str = "id,dateUTC,siteInstanceID,countryCode,status,dataSource,targetRefID,title,userID,userEmail,trafficSource,registerSource,isSearchable,hasJbeAlert,isDataFromCV,deviceType,timeCreatedUTC,timeUpdatedUTC,timeModifiedDB";

pub fn csv_line(id: &str, date: &str, user: &str, status: &str) -> String {
    format!(
        "{id},{date},1,IT,{status},web,ref,Nurse,{user},x@example.com,seo,organic,1,0,0,mobile,2025-03-01 10:00:00,2025-03-01 10:00:00,2025-03-01 10:00:00"
    )
}

/// Write a CSV with the standard header and `lines` as data rows.
pub fn write_csv(name: &str, lines: &[String]) -> String {
    let path = temp_out(name, "csv");
    let mut body = String::from(CSV_HEADER);
    for l in lines {
        body.push('\n');
        body.push_str(l);
    }
    body.push('\n');
    fs::write(&path, body).expect("write csv");
    path
}
