use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::source::resolve_local;
use crate::core::ingest::{IngestLogic, IngestOptions};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::schema::table_exists;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

pub fn handle(cmd: &Commands, cfg: &Config, cli_db: Option<&str>) -> AppResult<()> {
    if let Commands::Ingest {
        file,
        failures,
        batch_size,
    } = cmd
    {
        let csv_path = expand_tilde(file);
        if !csv_path.exists() {
            return Err(AppError::Ingest(format!(
                "CSV file not found: {}",
                csv_path.display()
            )));
        }

        // ingest always targets the local store, never the remote one
        let target = resolve_local(cfg, cli_db)
            .map_err(|e| AppError::ConfigUnavailable(e.to_string()))?;

        let opts = IngestOptions {
            table: target.table_name.clone(),
            batch_size: batch_size.unwrap_or(cfg.batch_size),
            failure_log: Some(PathBuf::from(
                failures.as_deref().unwrap_or(&cfg.failure_log),
            )),
        };

        let mut pool = DbPool::new(&target.database)?;
        let result = IngestLogic::ingest(&mut pool.conn, &csv_path, &opts);

        if let Err(e) = &result
            && table_exists(&pool.conn, "log").unwrap_or(false)
        {
            ttlog_quiet(
                &pool.conn,
                "ingest_failed",
                &csv_path.display().to_string(),
                &e.to_string(),
            );
        }
        result?;
    }
    Ok(())
}
