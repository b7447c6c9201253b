//! Remote configuration document store.
//!
//! A SQLite file holding a `documents` collection of JSON bodies tagged by
//! `type`. The connection config is the `connection_config` object of the
//! newest `db_connection_config` document in the configured collection.

use super::source::SourceConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde_json::json;

pub const CONFIG_DOCUMENT_TYPE: &str = "db_connection_config";

pub fn ensure_documents_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            collection  TEXT NOT NULL,
            type        TEXT NOT NULL,
            body        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection_type
            ON documents(collection, type);
        "#,
    )
}

/// Fetch the connection config from the store.
///
/// `Ok(None)` when the store is reachable but holds no usable document.
pub fn fetch_connection_config(store: &str, collection: &str) -> AppResult<Option<SourceConfig>> {
    let path = expand_tilde(store);
    if !path.exists() {
        return Err(AppError::ConfigUnavailable(format!(
            "config store not found: {}",
            path.display()
        )));
    }

    let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents
             WHERE collection = ?1 AND type = ?2
             ORDER BY id DESC LIMIT 1",
            params![collection, CONFIG_DOCUMENT_TYPE],
            |row| row.get(0),
        )
        .optional()?;

    let Some(body) = body else {
        return Ok(None);
    };

    let doc: serde_json::Value = serde_json::from_str(&body)?;
    match doc.get("connection_config") {
        Some(section) => Ok(Some(serde_json::from_value(section.clone())?)),
        None => Ok(None),
    }
}

/// Store `config` as the newest connection-config document, creating the
/// store if needed. Returns the new document id.
pub fn publish_connection_config(
    store: &str,
    collection: &str,
    config: &SourceConfig,
) -> AppResult<i64> {
    let path = expand_tilde(store);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(&path)?;
    ensure_documents_table(&conn)?;

    let body = json!({
        "type": CONFIG_DOCUMENT_TYPE,
        "connection_config": config,
    });

    conn.execute(
        "INSERT INTO documents (collection, type, body) VALUES (?1, ?2, ?3)",
        params![collection, CONFIG_DOCUMENT_TYPE, body.to_string()],
    )?;

    Ok(conn.last_insert_rowid())
}
