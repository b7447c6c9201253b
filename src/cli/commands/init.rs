use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the local SQLite database with every pending migration
pub fn handle(cli: &Cli) -> AppResult<()> {
    //
    // 1) configuration
    //
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    header("Initializing jobinsight");
    info(format!("Config file : {}", Config::config_file().display()));
    info(format!("Database    : {db_path}"));

    //
    // 2) schema
    //
    let pool = DbPool::new(&db_path)?;
    let applied = run_pending_migrations(&pool.conn, &cfg.table_name)?;
    success(format!(
        "Database initialized at {db_path} ({} migration(s) applied)",
        applied.len()
    ));

    //
    // 3) internal log (non-blocking)
    //
    ttlog_quiet(
        &pool.conn,
        "init",
        &cfg.table_name,
        &format!("Database initialized at {db_path}"),
    );

    success("jobinsight initialization completed!");
    Ok(())
}
