use super::status::{DeviceClass, JobpageStatus};
use super::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical column names shared by the normalizer, dedup and reports.
pub mod columns {
    pub const ID: &str = "id";
    pub const APPLICANT_ID: &str = "applicant_id";
    pub const APPLICATION_DATE: &str = "application_date";
    pub const APPLICATION_STATUS: &str = "application_status";
    pub const APPLICANT_LOCATION: &str = "applicant_location";
    pub const JOB_TITLE: &str = "job_title";
    pub const DTYPE: &str = "dtype";
    pub const REGSOURCE: &str = "regsource";

    pub const JOBPAGE_STATUS: &str = "jobpage_status";
    pub const MONTH: &str = "month";
    pub const DAY_OF_MONTH: &str = "day_of_month";
    pub const YEAR_MONTH: &str = "year_month";

    /// Columns the normalizer reads into typed fields.
    pub const TYPED: [&str; 8] = [
        ID,
        APPLICANT_ID,
        APPLICATION_DATE,
        APPLICATION_STATUS,
        APPLICANT_LOCATION,
        JOB_TITLE,
        DTYPE,
        REGSOURCE,
    ];

    /// Columns every normalized table carries, whatever the source had.
    pub const ALWAYS_PRESENT: [&str; 4] = [APPLICANT_LOCATION, DTYPE, REGSOURCE, JOBPAGE_STATUS];

    /// Present only when the source had a date column.
    pub const CALENDAR: [&str; 4] = [APPLICATION_DATE, MONTH, DAY_OF_MONTH, YEAR_MONTH];
}

/// One application event after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: Option<i64>,
    pub applicant_id: Option<String>,
    pub application_status: Option<String>,
    pub jobpage_status: JobpageStatus,
    /// `None` only when the source had no date column at all.
    #[serde(with = "timestamp", default)]
    pub application_date: Option<NaiveDateTime>,
    pub month: Option<u32>,
    pub day_of_month: Option<u32>,
    pub year_month: Option<String>,
    pub applicant_location: String,
    pub job_title: Option<String>,
    pub dtype: String,
    pub regsource: String,
    /// Source columns without a typed field, carried through as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ApplicationRecord {
    pub fn is_active(&self) -> bool {
        self.jobpage_status.is_active()
    }

    pub fn device_class(&self) -> DeviceClass {
        DeviceClass::from_dtype(&self.dtype)
    }

    pub fn application_day(&self) -> Option<NaiveDate> {
        self.application_date.map(|d| d.date())
    }
}

/// Normalized records plus the set of canonical columns they came with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationTable {
    columns: BTreeSet<String>,
    records: Vec<ApplicationRecord>,
}

impl ApplicationTable {
    pub fn new(columns: BTreeSet<String>, records: Vec<ApplicationRecord>) -> Self {
        Self { columns, records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Table built from records alone (e.g. a rehydrated snapshot):
    /// optional columns count as present when any record has them.
    pub fn from_records(records: Vec<ApplicationRecord>) -> Self {
        let mut present: BTreeSet<String> = columns::ALWAYS_PRESENT
            .iter()
            .map(|c| c.to_string())
            .collect();
        if records.iter().any(|r| r.id.is_some()) {
            present.insert(columns::ID.to_string());
        }
        if records.iter().any(|r| r.applicant_id.is_some()) {
            present.insert(columns::APPLICANT_ID.to_string());
        }
        if records.iter().any(|r| r.application_date.is_some()) {
            present.extend(columns::CALENDAR.iter().map(|c| c.to_string()));
        }
        Self::new(present, records)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records at `indices`, in that order.
    pub fn select_rows(self, indices: &[usize]) -> Self {
        let mut slots: Vec<Option<ApplicationRecord>> =
            self.records.into_iter().map(Some).collect();
        let records = indices
            .iter()
            .filter_map(|&i| slots.get_mut(i)?.take())
            .collect();
        Self {
            columns: self.columns,
            records,
        }
    }
}

/// `application_date` travels as `YYYY-MM-DD HH:MM:SS[.fff]`, or null.
mod timestamp {
    use crate::utils::date::{TIMESTAMP_FORMAT, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_str(&dt.format(TIMESTAMP_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid application_date '{raw}'"))),
            None => Ok(None),
        }
    }
}
