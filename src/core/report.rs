//! Filters and aggregate breakdowns over normalized records.

use crate::errors::{AppError, AppResult};
use crate::models::{ApplicationRecord, DeviceClass, JobpageStatus};
use crate::utils::formatting::percent;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const NO_DATA: &str = "No data available for the selected filters.";

/// Record filters. Empty lists mean "no filter".
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub months: Vec<u32>,
    pub countries: Vec<String>,
    /// `None` or `all` means every title.
    pub job_title: Option<String>,
    /// Raw application statuses, matched case-insensitively.
    pub statuses: Vec<String>,
    /// Device types, matched case-insensitively.
    pub devices: Vec<String>,
    pub regsources: Vec<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Filters {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(m) = self.months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(AppError::InvalidFilter(format!("month {m} is out of range")));
        }
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(AppError::InvalidFilter(format!(
                "start date {from} is after end date {to}"
            )));
        }
        Ok(())
    }

    pub fn matches(&self, r: &ApplicationRecord) -> bool {
        if !self.months.is_empty() && !r.month.is_some_and(|m| self.months.contains(&m)) {
            return false;
        }
        if !self.countries.is_empty() && !self.countries.contains(&r.applicant_location) {
            return false;
        }
        if let Some(title) = self.job_title.as_deref()
            && !title.eq_ignore_ascii_case("all")
            && r.job_title.as_deref() != Some(title)
        {
            return false;
        }
        if !self.statuses.is_empty() {
            let status = r.application_status.as_deref().unwrap_or("");
            if !self.statuses.iter().any(|s| s.trim().eq_ignore_ascii_case(status)) {
                return false;
            }
        }
        if !self.devices.is_empty() {
            let dtype = r.dtype.trim();
            if !self.devices.iter().any(|d| d.trim().eq_ignore_ascii_case(dtype)) {
                return false;
            }
        }
        if !self.regsources.is_empty() && !self.regsources.contains(&r.regsource) {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(day) = r.application_day() else {
                return false;
            };
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [ApplicationRecord]) -> Vec<&'a ApplicationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Choices available for each filter in the loaded data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub months: Vec<u32>,
    pub countries: Vec<String>,
    pub job_titles: Vec<String>,
    pub statuses: Vec<String>,
    pub devices: Vec<String>,
    pub regsources: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

pub fn filter_options(records: &[ApplicationRecord]) -> FilterOptions {
    let mut months = BTreeSet::new();
    let mut countries = BTreeSet::new();
    let mut titles = BTreeSet::new();
    let mut statuses = BTreeSet::new();
    let mut devices = BTreeSet::new();
    let mut regsources = BTreeSet::new();

    for r in records {
        if let Some(m) = r.month {
            months.insert(m);
        }
        countries.insert(r.applicant_location.clone());
        if let Some(t) = &r.job_title {
            titles.insert(t.clone());
        }
        if let Some(s) = &r.application_status {
            statuses.insert(s.clone());
        }
        devices.insert(r.dtype.clone());
        regsources.insert(r.regsource.clone());
    }

    FilterOptions {
        months: months.into_iter().collect(),
        countries: countries.into_iter().collect(),
        job_titles: titles.into_iter().collect(),
        statuses: statuses.into_iter().collect(),
        devices: devices.into_iter().collect(),
        regsources: regsources.into_iter().collect(),
        min_date: records.iter().filter_map(|r| r.application_day()).min(),
        max_date: records.iter().filter_map(|r| r.application_day()).max(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub active_pct: f64,
    pub mobile: usize,
    pub desktop: usize,
    pub mobile_pct: f64,
}

pub fn summary(records: &[&ApplicationRecord]) -> Summary {
    let total = records.len();
    let active = records.iter().filter(|r| r.is_active()).count();
    let mobile = count_device(records, DeviceClass::Mobile);
    let desktop = count_device(records, DeviceClass::Desktop);

    Summary {
        total,
        active,
        inactive: total - active,
        active_pct: percent(active, total),
        mobile,
        desktop,
        mobile_pct: percent(mobile, total),
    }
}

fn count_device(records: &[&ApplicationRecord], class: DeviceClass) -> usize {
    records.iter().filter(|r| r.device_class() == class).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDimension {
    DayOfMonth,
    YearMonth,
    Location,
    Regsource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusRow {
    pub key: String,
    pub active: usize,
    pub inactive: usize,
    pub total: usize,
    pub active_pct: f64,
}

#[derive(Default)]
struct StatusCounts {
    active: usize,
    inactive: usize,
}

/// Active/Inactive counts per key. Calendar keys sort ascending,
/// categorical keys by total descending then key.
pub fn status_breakdown(records: &[&ApplicationRecord], dim: StatusDimension) -> Vec<StatusRow> {
    let mut by_day: BTreeMap<u32, StatusCounts> = BTreeMap::new();
    let mut by_key: BTreeMap<&str, StatusCounts> = BTreeMap::new();

    for r in records {
        let counts = match dim {
            StatusDimension::DayOfMonth => match r.day_of_month {
                Some(day) => by_day.entry(day).or_default(),
                None => continue,
            },
            StatusDimension::YearMonth => match r.year_month.as_deref() {
                Some(ym) => by_key.entry(ym).or_default(),
                None => continue,
            },
            StatusDimension::Location => by_key.entry(r.applicant_location.as_str()).or_default(),
            StatusDimension::Regsource => by_key.entry(r.regsource.as_str()).or_default(),
        };
        match r.jobpage_status {
            JobpageStatus::Active => counts.active += 1,
            JobpageStatus::Inactive => counts.inactive += 1,
        }
    }

    let mut rows: Vec<StatusRow> = by_day
        .into_iter()
        .map(|(day, c)| status_row(day.to_string(), c))
        .chain(by_key.into_iter().map(|(k, c)| status_row(k.to_string(), c)))
        .collect();

    if matches!(dim, StatusDimension::Location | StatusDimension::Regsource) {
        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    }
    rows
}

fn status_row(key: String, c: StatusCounts) -> StatusRow {
    let total = c.active + c.inactive;
    StatusRow {
        key,
        active: c.active,
        inactive: c.inactive,
        total,
        active_pct: percent(c.active, total),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceDimension {
    Overall,
    DayOfMonth,
    YearMonth,
    Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub key: String,
    pub mobile: usize,
    pub desktop: usize,
    pub other: usize,
    pub total: usize,
    pub mobile_pct: f64,
}

#[derive(Default)]
struct DeviceCounts {
    mobile: usize,
    desktop: usize,
    other: usize,
}

/// Mobile/Desktop/Other counts per key. Locations sort by
/// mobile + desktop descending, calendar keys ascending.
pub fn device_breakdown(records: &[&ApplicationRecord], dim: DeviceDimension) -> Vec<DeviceRow> {
    let mut by_day: BTreeMap<u32, DeviceCounts> = BTreeMap::new();
    let mut by_key: HashMap<&str, DeviceCounts> = HashMap::new();

    for r in records {
        let counts = match dim {
            DeviceDimension::Overall => by_key.entry("All").or_default(),
            DeviceDimension::DayOfMonth => match r.day_of_month {
                Some(day) => by_day.entry(day).or_default(),
                None => continue,
            },
            DeviceDimension::YearMonth => match r.year_month.as_deref() {
                Some(ym) => by_key.entry(ym).or_default(),
                None => continue,
            },
            DeviceDimension::Location => by_key.entry(r.applicant_location.as_str()).or_default(),
        };
        match r.device_class() {
            DeviceClass::Mobile => counts.mobile += 1,
            DeviceClass::Desktop => counts.desktop += 1,
            DeviceClass::Other => counts.other += 1,
        }
    }

    let mut rows: Vec<DeviceRow> = by_day
        .into_iter()
        .map(|(day, c)| device_row(day.to_string(), c))
        .chain(by_key.into_iter().map(|(k, c)| device_row(k.to_string(), c)))
        .collect();

    match dim {
        DeviceDimension::Location => rows.sort_by(|a, b| {
            (b.mobile + b.desktop)
                .cmp(&(a.mobile + a.desktop))
                .then_with(|| a.key.cmp(&b.key))
        }),
        DeviceDimension::YearMonth => rows.sort_by(|a, b| a.key.cmp(&b.key)),
        DeviceDimension::Overall | DeviceDimension::DayOfMonth => {}
    }
    rows
}

fn device_row(key: String, c: DeviceCounts) -> DeviceRow {
    let total = c.mobile + c.desktop + c.other;
    DeviceRow {
        key,
        mobile: c.mobile,
        desktop: c.desktop,
        other: c.other,
        total,
        mobile_pct: percent(c.mobile, total),
    }
}
