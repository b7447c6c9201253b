//! Snapshot export of the normalized collection.

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;

pub use json_csv::{read_snapshot, snapshot_from_json, snapshot_to_json};
pub use logic::ExportLogic;
pub use model::SnapshotRow;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path, rows: usize) {
    success(format!("{label} export completed: {} ({rows} rows)", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}
