use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::models::ApplicationTable;
use crate::ui::messages::warning;
use std::path::Path;

/// High-level snapshot export.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `table` to `file`.
    ///
    /// - `file` must be an absolute path
    /// - an existing file is overwritten only with `force` or after
    ///   confirmation
    ///
    /// Returns the number of exported records; an empty table writes
    /// nothing.
    pub fn export(
        table: &ApplicationTable,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        if table.is_empty() {
            warning("No records to export.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(table.records(), path)?,
            ExportFormat::Json => export_json(table.records(), path)?,
        }

        Ok(table.len())
    }
}
