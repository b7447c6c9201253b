use crate::db::pool::DbPool;
use crate::db::schema::table_exists;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Figures shown by `db --info`.
#[derive(Debug, Default)]
pub struct DbInfo {
    pub file_size: u64,
    pub table_present: bool,
    pub records: i64,
    pub applicants: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub max_id: Option<i64>,
}

/// Collect table statistics. The caller validates `table`.
pub fn collect(pool: &DbPool, db_path: &str, table: &str) -> AppResult<DbInfo> {
    let mut info = DbInfo {
        file_size: fs::metadata(db_path).map(|m| m.len()).unwrap_or(0),
        ..DbInfo::default()
    };

    if !table_exists(&pool.conn, table)? {
        return Ok(info);
    }
    info.table_present = true;

    let (records, applicants, max_id): (i64, i64, Option<i64>) = pool.conn.query_row(
        &format!("SELECT COUNT(*), COUNT(DISTINCT userID), MAX(id) FROM {table}"),
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    info.records = records;
    info.applicants = applicants;
    info.max_id = max_id;

    info.first_date = pool
        .conn
        .query_row(
            &format!("SELECT MIN(dateUTC) FROM {table} WHERE dateUTC IS NOT NULL"),
            [],
            |row| row.get(0),
        )
        .optional()?
        .flatten();

    info.last_date = pool
        .conn
        .query_row(
            &format!("SELECT MAX(dateUTC) FROM {table} WHERE dateUTC IS NOT NULL"),
            [],
            |row| row.get(0),
        )
        .optional()?
        .flatten();

    Ok(info)
}

pub fn print_db_info(pool: &DbPool, db_path: &str, table: &str) -> AppResult<()> {
    let info = collect(pool, db_path, table)?;
    let file_mb = (info.file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    if !info.table_present {
        println!("{}• Table:{} {}{} (missing){}", CYAN, RESET, GREY, table, RESET);
        println!();
        return Ok(());
    }

    println!("{}• Table:{} {}", CYAN, RESET, table);
    println!(
        "{}• Records:{} {}{}{}",
        CYAN, RESET, GREEN, info.records, RESET
    );
    println!(
        "{}• Distinct applicants:{} {}{}{}",
        CYAN, RESET, GREEN, info.applicants, RESET
    );

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", info.first_date.as_deref().unwrap_or(&dash));
    println!("    to:   {}", info.last_date.as_deref().unwrap_or(&dash));

    if let Some(max_id) = info.max_id {
        println!("{}• Latest id:{} {}", CYAN, RESET, max_id);
    }

    println!();
    Ok(())
}
