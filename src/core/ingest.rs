//! CSV bulk ingestion into the applications table.

use crate::db::log::ttlog_quiet;
use crate::db::migrate::run_pending_migrations;
use crate::db::schema::{ColumnType, OPTIONAL_COLUMNS, TYPE_MAP, column_type};
use crate::errors::{AppError, AppResult};
use crate::models::Value;
use crate::ui::messages::{error, info, success, warning};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, params_from_iter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub table: String,
    pub batch_size: usize,
    /// CSV file failures are appended to; `None` disables the log.
    pub failure_log: Option<PathBuf>,
}

/// A CSV row that was not inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// 1-based data row index (header excluded).
    pub row: usize,
    pub error: String,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub first_row: usize,
    pub last_row: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_valid: usize,
    pub rows_inserted: usize,
    pub row_failures: Vec<RowFailure>,
    pub batch_failures: Vec<BatchFailure>,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        format!(
            "read={} valid={} inserted={} row_failures={} batch_failures={}",
            self.rows_read,
            self.rows_valid,
            self.rows_inserted,
            self.row_failures.len(),
            self.batch_failures.len()
        )
    }
}

/// One line of the failure log.
#[derive(Serialize)]
struct FailureLine<'a> {
    row: usize,
    error: &'a str,
    data: String,
}

/// A row that passed validation, waiting for its batch.
struct PendingRow {
    row: usize,
    values: Vec<Value>,
    raw: BTreeMap<String, String>,
}

pub struct IngestLogic;

impl IngestLogic {
    pub fn ingest(
        conn: &mut Connection,
        csv_path: &Path,
        opts: &IngestOptions,
    ) -> AppResult<IngestReport> {
        if opts.batch_size == 0 {
            return Err(AppError::Ingest("batch size must be a positive integer".into()));
        }

        // 1) header checks
        let mut rdr = csv::Reader::from_path(csv_path)?;
        let header: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if header.iter().all(|h| h.is_empty()) {
            return Err(AppError::Ingest(
                "CSV file is empty or has no header row.".into(),
            ));
        }

        let missing: Vec<&str> = TYPE_MAP
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !OPTIONAL_COLUMNS.contains(name) && !header.iter().any(|h| h == name))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Ingest(format!(
                "required columns missing from the CSV header: {}",
                missing.join(", ")
            )));
        }

        // (header index, column, type) for columns we insert, in header order
        let used: Vec<(usize, &str, ColumnType)> = header
            .iter()
            .enumerate()
            .filter_map(|(i, h)| column_type(h).map(|ty| (i, h.as_str(), ty)))
            .collect();

        // 2) target table
        run_pending_migrations(conn, &opts.table)?;

        // 3) validate rows
        let mut report = IngestReport::default();
        let mut pending = Vec::new();

        for (idx, record) in rdr.records().enumerate() {
            let row = idx + 1;
            report.rows_read += 1;

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    report.row_failures.push(RowFailure {
                        row,
                        error: format!("unreadable CSV row: {e}"),
                        data: BTreeMap::new(),
                    });
                    continue;
                }
            };

            let raw: BTreeMap<String, String> = header
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();

            match cast_row(&record, &used) {
                Ok(values) => pending.push(PendingRow { row, values, raw }),
                Err(reason) => {
                    warning(format!("Row {row}: {reason}"));
                    report.row_failures.push(RowFailure {
                        row,
                        error: reason,
                        data: raw,
                    });
                }
            }
        }
        report.rows_valid = pending.len();

        // 4) insert in batches, one transaction each
        if pending.is_empty() {
            warning("No valid records found in the CSV to insert.");
        } else {
            info(format!("Found {} records to insert.", pending.len()));
            let sql = insert_sql(&opts.table, &used);

            for chunk in pending.chunks(opts.batch_size) {
                let first_row = chunk[0].row;
                let last_row = chunk[chunk.len() - 1].row;

                match insert_batch(conn, &sql, chunk) {
                    Ok(()) => {
                        report.rows_inserted += chunk.len();
                        info(format!("Committed rows {first_row}-{last_row}."));
                    }
                    Err(e) => {
                        let reason = format!("batch rolled back: {e}");
                        error(format!("Rows {first_row}-{last_row}: {reason}"));
                        report.batch_failures.push(BatchFailure {
                            first_row,
                            last_row,
                            error: e.to_string(),
                        });
                        for p in chunk {
                            report.row_failures.push(RowFailure {
                                row: p.row,
                                error: reason.clone(),
                                data: p.raw.clone(),
                            });
                        }
                    }
                }
            }
        }

        // 5) failure log + internal log
        if let Some(log_path) = &opts.failure_log
            && !report.row_failures.is_empty()
        {
            write_failure_log(log_path, &report.row_failures)?;
            warning(format!(
                "{} failed row(s) written to '{}'.",
                report.row_failures.len(),
                log_path.display()
            ));
        }

        ttlog_quiet(
            conn,
            "ingest",
            &csv_path.display().to_string(),
            &report.summary(),
        );
        success(format!("Ingest completed: {}", report.summary()));

        Ok(report)
    }
}

fn cast_row(
    record: &csv::StringRecord,
    used: &[(usize, &str, ColumnType)],
) -> Result<Vec<Value>, String> {
    used.iter()
        .map(|(i, name, ty)| cast_cell(record.get(*i).unwrap_or(""), *ty, name))
        .collect()
}

/// Cast one CSV cell to its column type.
pub fn cast_cell(raw: &str, ty: ColumnType, column: &str) -> Result<Value, String> {
    let value = raw.trim();
    if value.is_empty() {
        if column == "id" {
            return Err("ID cannot be empty.".into());
        }
        return Ok(Value::Null);
    }

    match ty {
        ColumnType::Int => value
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| mismatch(ty, column, raw)),
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|_| Value::Text(value.to_string()))
            .map_err(|_| mismatch(ty, column, raw)),
        ColumnType::DateTime => NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .map(|_| Value::Text(value.to_string()))
            .map_err(|_| mismatch(ty, column, raw)),
    }
}

fn mismatch(ty: ColumnType, column: &str, raw: &str) -> String {
    format!(
        "Type mismatch: expected {} for column '{column}' but got '{raw}'.",
        ty.label()
    )
}

fn insert_sql(table: &str, used: &[(usize, &str, ColumnType)]) -> String {
    let names: Vec<&str> = used.iter().map(|(_, n, _)| *n).collect();
    let slots: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        names.join(", "),
        slots.join(", ")
    )
}

fn insert_batch(conn: &mut Connection, sql: &str, chunk: &[PendingRow]) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare_cached(sql)?;
        for p in chunk {
            stmt.execute(params_from_iter(p.values.iter()))?;
        }
    }
    tx.commit()
}

/// Append failures as `row,error,data`; the header goes only into a new
/// file.
fn write_failure_log(path: &Path, failures: &[RowFailure]) -> AppResult<()> {
    let is_new = !path.exists() || path.metadata().map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(is_new).from_writer(file);

    for f in failures {
        wtr.serialize(FailureLine {
            row: f.row,
            error: &f.error,
            data: serde_json::to_string(&f.data)?,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
