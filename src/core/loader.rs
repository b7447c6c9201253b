//! Bounded read of the most recent records from the backing store.

use crate::config::SourceConfig;
use crate::db::pool::DbPool;
use crate::db::schema::is_valid_identifier;
use crate::errors::{AppError, AppResult};
use crate::models::{RawTable, Value};
use crate::ui::messages::{error, info};

/// A store that can hand back its latest records, newest first.
pub trait RecordSource {
    /// Human-readable name used in log lines.
    fn describe(&self) -> String;

    fn fetch_latest(&self, row_cap: u32) -> AppResult<RawTable>;
}

/// Relational source: one SQLite table, ordered by `id`.
pub struct SqliteSource {
    database: String,
    table: String,
}

impl SqliteSource {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }

    pub fn from_config(cfg: &SourceConfig) -> Self {
        Self::new(cfg.database.clone(), cfg.table_name.clone())
    }
}

impl RecordSource for SqliteSource {
    fn describe(&self) -> String {
        format!("{} (table {})", self.database, self.table)
    }

    fn fetch_latest(&self, row_cap: u32) -> AppResult<RawTable> {
        if !is_valid_identifier(&self.table) {
            return Err(AppError::InvalidTableName(self.table.clone()));
        }

        let pool = DbPool::open_read_only(&self.database)?;
        let mut stmt = pool.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY id DESC LIMIT ?1",
            self.table
        ))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut table = RawTable::new(columns);

        let mut rows = stmt.query([row_cap])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(Value::from(row.get_ref(i)?));
            }
            table.push_row(cells);
        }

        Ok(table)
    }
}

/// Result of a load: the table is empty whenever `failure` is set.
#[derive(Debug)]
pub struct LoadOutcome {
    pub table: RawTable,
    pub failure: Option<String>,
}

/// Fetch up to `row_cap` records. Store errors are logged and turned into
/// an empty table; callers treat empty as "no data available".
pub fn load(source: &dyn RecordSource, row_cap: u32) -> LoadOutcome {
    match source.fetch_latest(row_cap) {
        Ok(table) => {
            info(format!(
                "Data loaded from {}: {} rows.",
                source.describe(),
                table.len()
            ));
            LoadOutcome {
                table,
                failure: None,
            }
        }
        Err(e) => {
            error(format!("Error loading data from {}: {e}", source.describe()));
            LoadOutcome {
                table: RawTable::empty(),
                failure: Some(e.to_string()),
            }
        }
    }
}
