use crate::models::ApplicationRecord;
use crate::utils::date::TIMESTAMP_FORMAT;
use serde::Serialize;

/// Flat CSV row: the canonical columns only, extras are left out.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SnapshotRow {
    pub id: Option<i64>,
    pub applicant_id: Option<String>,
    pub application_date: Option<String>,
    pub application_status: Option<String>,
    pub jobpage_status: &'static str,
    pub applicant_location: String,
    pub job_title: Option<String>,
    pub dtype: String,
    pub regsource: String,
    pub month: Option<u32>,
    pub day_of_month: Option<u32>,
    pub year_month: Option<String>,
}

impl From<&ApplicationRecord> for SnapshotRow {
    fn from(r: &ApplicationRecord) -> Self {
        Self {
            id: r.id,
            applicant_id: r.applicant_id.clone(),
            application_date: r
                .application_date
                .map(|d| d.format(TIMESTAMP_FORMAT).to_string()),
            application_status: r.application_status.clone(),
            jobpage_status: r.jobpage_status.as_str(),
            applicant_location: r.applicant_location.clone(),
            job_title: r.job_title.clone(),
            dtype: r.dtype.clone(),
            regsource: r.regsource.clone(),
            month: r.month,
            day_of_month: r.day_of_month,
            year_month: r.year_month.clone(),
        }
    }
}
