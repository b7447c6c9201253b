//! Raw table → typed application records.
//!
//! Steps, in order: rename source fields, coerce the date (dropping rows
//! that fail), derive calendar fields and the Active/Inactive status,
//! clean the categorical columns.
//!
//! A source without any date column is a schema problem, not a row
//! problem: rows pass through with empty calendar fields.

use crate::models::application::columns;
use crate::models::{ApplicationRecord, ApplicationTable, JobpageStatus, RawTable, Value};
use crate::ui::messages::{info, warning};
use crate::utils::date::parse_timestamp;
use chrono::{Datelike, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

/// Source-native name → canonical name.
pub const FIELD_RENAMES: [(&str, &str); 7] = [
    ("dateUTC", columns::APPLICATION_DATE),
    ("status", columns::APPLICATION_STATUS),
    ("countryCode", columns::APPLICANT_LOCATION),
    ("title", columns::JOB_TITLE),
    ("userID", columns::APPLICANT_ID),
    ("deviceType", columns::DTYPE),
    ("registerSource", columns::REGSOURCE),
];

pub const UNKNOWN: &str = "Unknown";

/// Names the normalizer computes itself; source columns with these names
/// are not carried as extras.
const DERIVED: [&str; 4] = [
    columns::JOBPAGE_STATUS,
    columns::MONTH,
    columns::DAY_OF_MONTH,
    columns::YEAR_MONTH,
];

#[derive(Debug)]
pub struct NormalizeOutcome {
    pub table: ApplicationTable,
    pub input_rows: usize,
    /// Rows dropped because their date was missing or unparsable.
    pub dropped: usize,
}

/// Position of each typed column in the renamed raw table.
struct Layout {
    id: Option<usize>,
    applicant_id: Option<usize>,
    date: Option<usize>,
    status: Option<usize>,
    location: Option<usize>,
    title: Option<usize>,
    dtype: Option<usize>,
    regsource: Option<usize>,
    extras: Vec<(usize, String)>,
}

impl Layout {
    fn of(table: &RawTable) -> Self {
        let extras = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| !columns::TYPED.contains(&c.as_str()) && !DERIVED.contains(&c.as_str()))
            .map(|(i, c)| (i, c.clone()))
            .collect();

        Self {
            id: table.column_index(columns::ID),
            applicant_id: table.column_index(columns::APPLICANT_ID),
            date: table.column_index(columns::APPLICATION_DATE),
            status: table.column_index(columns::APPLICATION_STATUS),
            location: table.column_index(columns::APPLICANT_LOCATION),
            title: table.column_index(columns::JOB_TITLE),
            dtype: table.column_index(columns::DTYPE),
            regsource: table.column_index(columns::REGSOURCE),
            extras,
        }
    }
}

pub fn normalize(mut raw: RawTable) -> NormalizeOutcome {
    let input_rows = raw.len();
    if raw.is_empty() {
        warning("No data to normalize: the source returned no rows.");
        return NormalizeOutcome {
            table: ApplicationTable::empty(),
            input_rows,
            dropped: 0,
        };
    }

    // 1) rename
    for (from, to) in raw.rename_collisions(&FIELD_RENAMES) {
        warning(format!(
            "Both '{from}' and '{to}' are present: '{to}' is used, '{from}' is kept as is."
        ));
    }
    raw.rename_columns(&FIELD_RENAMES);
    let layout = Layout::of(&raw);

    let mut present: BTreeSet<String> = columns::ALWAYS_PRESENT
        .iter()
        .map(|c| c.to_string())
        .collect();
    if layout.date.is_some() {
        present.extend(columns::CALENDAR.iter().map(|c| c.to_string()));
    } else {
        warning(format!(
            "Column '{}' is missing: calendar fields are left empty.",
            columns::APPLICATION_DATE
        ));
    }
    for col in columns::TYPED {
        if raw.has_column(col) {
            present.insert(col.to_string());
        }
    }

    // 2-5) per-row coercion and derivation
    let (_, rows) = raw.into_parts();
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(record) = normalize_row(&layout, row) {
            records.push(record);
        }
    }

    let dropped = input_rows - records.len();
    if dropped > 0 {
        warning(format!(
            "{dropped} row(s) dropped: '{}' missing or not a valid date.",
            columns::APPLICATION_DATE
        ));
    }
    info(format!("Normalized {} of {input_rows} rows.", records.len()));

    NormalizeOutcome {
        table: ApplicationTable::new(present, records),
        input_rows,
        dropped,
    }
}

fn normalize_row(layout: &Layout, mut row: Vec<Value>) -> Option<ApplicationRecord> {
    let application_date = match layout.date {
        Some(_) => Some(coerce_date(cell(&row, layout.date))?),
        None => None,
    };

    let application_status = cell(&row, layout.status).and_then(Value::to_trimmed);
    let jobpage_status = JobpageStatus::from_raw(application_status.as_deref());

    let mut extra = BTreeMap::new();
    for (idx, name) in &layout.extras {
        if let Some(v) = row.get_mut(*idx) {
            extra.insert(name.clone(), std::mem::take(v));
        }
    }

    Some(ApplicationRecord {
        id: cell(&row, layout.id).and_then(Value::as_i64),
        applicant_id: cell(&row, layout.applicant_id).and_then(Value::to_trimmed),
        application_status,
        jobpage_status,
        month: application_date.map(|d| d.month()),
        day_of_month: application_date.map(|d| d.day()),
        year_month: application_date.map(|d| d.format("%Y-%m").to_string()),
        application_date,
        applicant_location: categorical(cell(&row, layout.location)),
        job_title: cell(&row, layout.title).and_then(Value::to_trimmed),
        dtype: categorical(cell(&row, layout.dtype)),
        regsource: categorical(cell(&row, layout.regsource)),
        extra,
    })
}

fn cell(row: &[Value], idx: Option<usize>) -> Option<&Value> {
    idx.and_then(|i| row.get(i))
}

/// Only text cells are parsed; numbers and NULL count as unparsable.
fn coerce_date(v: Option<&Value>) -> Option<NaiveDateTime> {
    match v {
        Some(Value::Text(s)) => parse_timestamp(s),
        _ => None,
    }
}

fn categorical(v: Option<&Value>) -> String {
    v.and_then(Value::to_trimmed)
        .unwrap_or_else(|| UNKNOWN.to_string())
}
