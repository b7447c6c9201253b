pub mod config;
pub mod db;
pub mod export;
pub mod ingest;
pub mod init;
pub mod load;
pub mod log;
pub mod report;

use crate::config::source::{self, ResolvedSource};
use crate::config::Config;
use crate::core::loader::SqliteSource;
use crate::core::pipeline::{DataView, PipelineReport, run_pipeline};
use crate::errors::{AppError, AppResult};
use crate::models::ApplicationTable;
use crate::ui::messages::info;

/// Resolve the data source; a failure means no data for this command.
pub(crate) fn resolve_source(cfg: &Config, cli_db: Option<&str>) -> AppResult<ResolvedSource> {
    source::resolve(cfg, cli_db).map_err(|e| AppError::ConfigUnavailable(e.to_string()))
}

/// Resolve, load and transform the data for `view`.
pub(crate) fn load_view(
    cfg: &Config,
    cli_db: Option<&str>,
    view: DataView,
) -> AppResult<(ApplicationTable, PipelineReport)> {
    let resolved = resolve_source(cfg, cli_db)?;
    info(format!("Data source: {}", resolved.origin));

    let source = SqliteSource::from_config(&resolved.config);
    Ok(run_pipeline(&source, resolved.config.row_cap, view))
}
