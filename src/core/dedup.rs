//! Latest-record-per-applicant reduction.

use crate::models::application::columns;
use crate::models::{ApplicationTable, RawTable};
use crate::ui::messages::{error, info};
use std::borrow::Cow;
use std::collections::HashSet;

/// A collection the deduplicator can reduce: it only needs the two key
/// columns and a way to keep a subset of rows.
pub trait Deduplicable: Sized {
    fn has_column(&self, name: &str) -> bool;
    fn row_count(&self) -> usize;
    fn row_id(&self, row: usize) -> Option<i64>;
    fn applicant_key(&self, row: usize) -> Option<Cow<'_, str>>;
    fn keep_rows(self, indices: &[usize]) -> Self;
}

impl Deduplicable for ApplicationTable {
    fn has_column(&self, name: &str) -> bool {
        ApplicationTable::has_column(self, name)
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_id(&self, row: usize) -> Option<i64> {
        self.records()[row].id
    }

    fn applicant_key(&self, row: usize) -> Option<Cow<'_, str>> {
        self.records()[row].applicant_id.as_deref().map(Cow::Borrowed)
    }

    fn keep_rows(self, indices: &[usize]) -> Self {
        self.select_rows(indices)
    }
}

impl Deduplicable for RawTable {
    fn has_column(&self, name: &str) -> bool {
        RawTable::has_column(self, name)
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_id(&self, row: usize) -> Option<i64> {
        self.get(row, columns::ID).and_then(|v| v.as_i64())
    }

    fn applicant_key(&self, row: usize) -> Option<Cow<'_, str>> {
        self.get(row, columns::APPLICANT_ID).and_then(|v| v.as_text())
    }

    fn keep_rows(self, indices: &[usize]) -> Self {
        self.select_rows(indices)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupStatus {
    Deduplicated { before: usize, after: usize },
    Empty,
    /// Schema error: the named key column is absent, input returned as-is.
    MissingColumn(&'static str),
}

#[derive(Debug)]
pub struct DedupOutcome<T> {
    pub table: T,
    pub status: DedupStatus,
}

/// Keep one row per `applicant_id`: the one with the highest `id`.
///
/// Survivors come out ordered by `id` descending; rows without an `id`
/// rank below every row that has one. A NULL applicant is its own key.
pub fn dedup_latest<T: Deduplicable>(table: T) -> DedupOutcome<T> {
    for required in [columns::ID, columns::APPLICANT_ID] {
        if !table.has_column(required) {
            error(format!(
                "Cannot deduplicate: column '{required}' is missing. Data left unchanged."
            ));
            return DedupOutcome {
                table,
                status: DedupStatus::MissingColumn(required),
            };
        }
    }

    let before = table.row_count();
    if before == 0 {
        return DedupOutcome {
            table,
            status: DedupStatus::Empty,
        };
    }

    let mut order: Vec<usize> = (0..before).collect();
    // stable: equal ids keep input order
    order.sort_by(|&a, &b| table.row_id(b).cmp(&table.row_id(a)));

    let keep: Vec<usize> = {
        let mut seen: HashSet<Option<Cow<'_, str>>> = HashSet::new();
        order
            .into_iter()
            .filter(|&i| seen.insert(table.applicant_key(i)))
            .collect()
    };

    let after = keep.len();
    info(format!("Deduplicated {before} rows to {after} unique applicants."));

    DedupOutcome {
        table: table.keep_rows(&keep),
        status: DedupStatus::Deduplicated { before, after },
    }
}
