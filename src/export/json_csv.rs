use crate::errors::{AppError, AppResult};
use crate::export::{SnapshotRow, notify_export_success};
use crate::models::{ApplicationRecord, ApplicationTable};
use crate::ui::messages::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// JSON array of flat objects, one per record, extras inlined.
pub fn snapshot_to_json(records: &[ApplicationRecord]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Rehydrate records from a JSON snapshot.
pub fn snapshot_from_json(json: &str) -> AppResult<Vec<ApplicationRecord>> {
    serde_json::from_str(json)
        .map_err(|e| AppError::Export(format!("invalid snapshot: {e}")))
}

/// Read a JSON snapshot file back into a table.
pub fn read_snapshot(path: &Path) -> AppResult<ApplicationTable> {
    let json = fs::read_to_string(path).map_err(|e| {
        AppError::Export(format!("cannot read snapshot {}: {e}", path.display()))
    })?;
    let records = snapshot_from_json(&json)?;
    info(format!(
        "Loaded {} records from snapshot {}",
        records.len(),
        path.display()
    ));
    Ok(ApplicationTable::from_records(records))
}

pub(crate) fn export_json(records: &[ApplicationRecord], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = snapshot_to_json(records)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path, records.len());
    Ok(())
}

/// Export CSV (header from the serde field names).
pub(crate) fn export_csv(records: &[ApplicationRecord], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    for r in records {
        wtr.serialize(SnapshotRow::from(r))?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path, records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobpageStatus, Value};
    use crate::utils::date::parse_timestamp;
    use std::collections::BTreeMap;

    fn record() -> ApplicationRecord {
        let mut extra = BTreeMap::new();
        extra.insert("userEmail".to_string(), Value::from("a@b.c"));
        extra.insert("siteInstanceID".to_string(), Value::Integer(12));
        ApplicationRecord {
            id: Some(42),
            applicant_id: Some("7".into()),
            application_status: Some("active".into()),
            jobpage_status: JobpageStatus::Active,
            application_date: parse_timestamp("2025-06-01 09:30:00"),
            month: Some(6),
            day_of_month: Some(1),
            year_month: Some("2025-06".into()),
            applicant_location: "IT".into(),
            job_title: None,
            dtype: "desktop".into(),
            regsource: "Unknown".into(),
            extra,
        }
    }

    #[test]
    fn json_snapshot_is_flat_and_rehydrates() {
        let json = snapshot_to_json(&[record()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = &v[0];

        assert_eq!(obj["application_date"], "2025-06-01 09:30:00");
        assert_eq!(obj["jobpage_status"], "Active");
        assert_eq!(obj["year_month"], "2025-06");
        assert_eq!(obj["userEmail"], "a@b.c");
        assert!(obj.get("extra").is_none());

        let back = snapshot_from_json(&json).unwrap();
        assert_eq!(back, vec![record()]);
    }

    #[test]
    fn fractional_seconds_survive_rehydration() {
        let mut r = record();
        r.application_date = parse_timestamp("2025-01-01 10:00:00.750");
        let json = snapshot_to_json(std::slice::from_ref(&r)).unwrap();

        assert!(json.contains("\"2025-01-01 10:00:00.750\""));
        assert_eq!(snapshot_from_json(&json).unwrap(), vec![r]);
    }

    #[test]
    fn undated_record_rehydrates_with_null_date() {
        let mut r = record();
        r.application_date = None;
        r.month = None;
        r.day_of_month = None;
        r.year_month = None;
        let json = snapshot_to_json(std::slice::from_ref(&r)).unwrap();

        assert!(json.contains("\"application_date\": null"));
        assert_eq!(snapshot_from_json(&json).unwrap(), vec![r]);
    }

    #[test]
    fn bad_snapshot_is_an_export_error() {
        let err = snapshot_from_json(r#"[{"id": 1}]"#).unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }

    #[test]
    fn csv_has_canonical_header() {
        let path = std::env::temp_dir().join("jobinsight_snapshot_test.csv");
        export_csv(&[record()], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,applicant_id,application_date,application_status,jobpage_status,\
             applicant_location,job_title,dtype,regsource,month,day_of_month,year_month"
        );
        assert_eq!(
            lines.next().unwrap(),
            "42,7,2025-06-01 09:30:00,active,Active,IT,,desktop,Unknown,6,1,2025-06"
        );
    }
}
