//! Loader → Normalizer → (optional) Deduplicator.

use super::dedup::{DedupStatus, dedup_latest};
use super::loader::{RecordSource, load};
use super::normalize::normalize;
use crate::models::ApplicationTable;
use clap::ValueEnum;
use std::fmt;

/// Which collection the presentation layer works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DataView {
    /// Every normalized record.
    #[default]
    Full,
    /// Only the latest record per applicant.
    LatestUnique,
}

impl fmt::Display for DataView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataView::Full => write!(f, "full"),
            DataView::LatestUnique => write!(f, "latest-unique"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub loaded: usize,
    pub dropped: usize,
    pub normalized: usize,
    /// `None` for the full view.
    pub deduplicated: Option<usize>,
    /// Set when the load failed; the table is then empty.
    pub load_error: Option<String>,
}

impl PipelineReport {
    pub fn final_rows(&self) -> usize {
        self.deduplicated.unwrap_or(self.normalized)
    }
}

pub fn run_pipeline(
    source: &dyn RecordSource,
    row_cap: u32,
    view: DataView,
) -> (ApplicationTable, PipelineReport) {
    let loaded = load(source, row_cap);
    let mut report = PipelineReport {
        loaded: loaded.table.len(),
        load_error: loaded.failure,
        ..PipelineReport::default()
    };

    let normalized = normalize(loaded.table);
    report.dropped = normalized.dropped;
    report.normalized = normalized.table.len();

    let table = match view {
        DataView::Full => normalized.table,
        DataView::LatestUnique => {
            let out = dedup_latest(normalized.table);
            report.deduplicated = Some(match out.status {
                DedupStatus::Deduplicated { after, .. } => after,
                DedupStatus::Empty => 0,
                DedupStatus::MissingColumn(_) => out.table.len(),
            });
            out.table
        }
    };

    (table, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, AppResult};
    use crate::models::{RawTable, Value};

    struct Fixed(RawTable);

    impl RecordSource for Fixed {
        fn describe(&self) -> String {
            "fixture".into()
        }

        fn fetch_latest(&self, row_cap: u32) -> AppResult<RawTable> {
            let keep: Vec<usize> = (0..self.0.len().min(row_cap as usize)).collect();
            Ok(self.0.clone().select_rows(&keep))
        }
    }

    struct Down;

    impl RecordSource for Down {
        fn describe(&self) -> String {
            "down".into()
        }

        fn fetch_latest(&self, _: u32) -> AppResult<RawTable> {
            Err(AppError::Other("connection refused".into()))
        }
    }

    fn fixture() -> Fixed {
        let mut t = RawTable::new(vec!["id".into(), "userID".into(), "dateUTC".into()]);
        t.push_row(vec![Value::Integer(4), Value::Integer(1), "2025-01-04".into()]);
        t.push_row(vec![Value::Integer(3), Value::Integer(2), "bogus".into()]);
        t.push_row(vec![Value::Integer(2), Value::Integer(1), "2025-01-02".into()]);
        t.push_row(vec![Value::Integer(1), Value::Integer(3), "2025-01-01".into()]);
        Fixed(t)
    }

    #[test]
    fn full_view_counts() {
        let (table, report) = run_pipeline(&fixture(), 100, DataView::Full);
        assert_eq!(report.loaded, 4);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.normalized, 3);
        assert_eq!(report.deduplicated, None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn latest_unique_view() {
        let (table, report) = run_pipeline(&fixture(), 100, DataView::LatestUnique);
        assert_eq!(report.deduplicated, Some(2));
        assert_eq!(report.final_rows(), 2);
        let ids: Vec<_> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(4), Some(1)]);
    }

    #[test]
    fn row_cap_is_passed_to_the_source() {
        let (_, report) = run_pipeline(&fixture(), 2, DataView::Full);
        assert_eq!(report.loaded, 2);
    }

    #[test]
    fn failed_load_yields_no_data() {
        let (table, report) = run_pipeline(&Down, 100, DataView::LatestUnique);
        assert!(table.is_empty());
        assert_eq!(report.final_rows(), 0);
        let err = report.load_error.as_deref().unwrap();
        assert!(err.contains("connection refused"));
    }
}
