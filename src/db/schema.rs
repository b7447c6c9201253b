//! Layout of the applications table and the type map used to validate
//! CSV ingestion.

use regex::Regex;
use rusqlite::{Connection, OptionalExtension, Result};
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("valid identifier regex"));

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Text,
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Int => "INTEGER",
            ColumnType::Text | ColumnType::Date | ColumnType::DateTime => "TEXT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Text => "str",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
        }
    }
}

/// Source-native columns of the applications table, in table order.
pub const TYPE_MAP: [(&str, ColumnType); 20] = [
    ("id", ColumnType::Int),
    ("dateUTC", ColumnType::Date),
    ("siteInstanceID", ColumnType::Int),
    ("countryCode", ColumnType::Text),
    ("status", ColumnType::Text),
    ("dataSource", ColumnType::Text),
    ("targetRefID", ColumnType::Text),
    ("title", ColumnType::Text),
    ("userID", ColumnType::Int),
    ("userEmail", ColumnType::Text),
    ("trafficSource", ColumnType::Text),
    ("registerSource", ColumnType::Text),
    ("isSearchable", ColumnType::Int),
    ("hasJbeAlert", ColumnType::Int),
    ("isDataFromCV", ColumnType::Int),
    ("deviceType", ColumnType::Text),
    ("timeCreatedUTC", ColumnType::DateTime),
    ("timeUpdatedUTC", ColumnType::DateTime),
    ("timeModifiedDB", ColumnType::DateTime),
    ("row_num", ColumnType::Int),
];

/// Columns a CSV may omit.
pub const OPTIONAL_COLUMNS: [&str; 1] = ["row_num"];

pub fn column_type(name: &str) -> Option<ColumnType> {
    TYPE_MAP
        .iter()
        .find(|(col, _)| *col == name)
        .map(|(_, ty)| *ty)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// DDL for the applications table. The caller validates `table`.
pub fn applications_ddl(table: &str) -> String {
    let cols: Vec<String> = TYPE_MAP
        .iter()
        .map(|(name, ty)| {
            if *name == "id" {
                format!("    {name} INTEGER PRIMARY KEY")
            } else {
                format!("    {name} {}", ty.sql_type())
            }
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n{}\n);",
        cols.join(",\n")
    )
}
