//! Schema migrations.
//!
//! Applied migrations are recorded in the internal `log` table as
//! `migration_applied` rows, so the log doubles as the schema history.

use crate::db::schema::{applications_ddl, is_valid_identifier};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

struct Migration {
    version: &'static str,
    description: &'static str,
    apply: fn(&Connection, &str) -> rusqlite::Result<()>,
}

const MIGRATIONS: [Migration; 2] = [
    Migration {
        version: "20251001_0001_create_applications",
        description: "Created applications table",
        apply: create_applications,
    },
    Migration {
        version: "20251012_0002_applicant_index",
        description: "Indexed applications by applicant and id",
        apply: index_applicants,
    },
];

fn create_applications(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&applications_ddl(table))
}

fn index_applicants(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_user_id ON {table}(userID, id);"
    ))
}

fn migration_key(version: &str, table: &str) -> String {
    format!("{version}:{table}")
}

fn is_applied(conn: &Connection, key: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
        [key],
        |_| Ok(()),
    )
    .optional()
    .map(|r| r.is_some())
}

/// Public entry point: run all pending migrations for `table`.
/// Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection, table: &str) -> AppResult<Vec<&'static str>> {
    if !is_valid_identifier(table) {
        return Err(AppError::InvalidTableName(table.to_string()));
    }

    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS.iter() {
        let key = migration_key(m.version, table);
        if is_applied(conn, &key)? {
            continue;
        }

        (m.apply)(conn, table)
            .map_err(|e| AppError::Migration(format!("{} failed: {e}", m.version)))?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [key.as_str(), m.description],
        )?;

        success(format!("Migration applied: {}", m.version));
        applied.push(m.version);
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::table_exists;

    #[test]
    fn migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();

        let first = run_pending_migrations(&conn, "jobseeker_data").unwrap();
        assert_eq!(first.len(), MIGRATIONS.len());
        assert!(table_exists(&conn, "jobseeker_data").unwrap());

        let second = run_pending_migrations(&conn, "jobseeker_data").unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn rejects_bad_table_name() {
        let conn = Connection::open_in_memory().unwrap();
        let err = run_pending_migrations(&conn, "x y").unwrap_err();
        assert!(matches!(err, AppError::InvalidTableName(_)));
    }
}
