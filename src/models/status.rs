use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary classification of an application's free-text status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobpageStatus {
    Active,
    Inactive,
}

impl JobpageStatus {
    /// Active iff the trimmed, case-folded status equals `active`.
    /// A missing status is Inactive.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("active") => JobpageStatus::Active,
            _ => JobpageStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobpageStatus::Active => "Active",
            JobpageStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobpageStatus::Active)
    }
}

impl fmt::Display for JobpageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device bucket used by the device breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Desktop,
    Other,
}

impl DeviceClass {
    pub fn from_dtype(dtype: &str) -> Self {
        match dtype.trim().to_lowercase().as_str() {
            "mobile" => DeviceClass::Mobile,
            "desktop" => DeviceClass::Desktop,
            _ => DeviceClass::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_rule() {
        assert_eq!(JobpageStatus::from_raw(Some("active")), JobpageStatus::Active);
        assert_eq!(JobpageStatus::from_raw(Some("  ACTIVE ")), JobpageStatus::Active);
        assert_eq!(JobpageStatus::from_raw(Some("disabled")), JobpageStatus::Inactive);
        assert_eq!(JobpageStatus::from_raw(Some("inactive")), JobpageStatus::Inactive);
        assert_eq!(JobpageStatus::from_raw(None), JobpageStatus::Inactive);
    }

    #[test]
    fn device_buckets() {
        assert_eq!(DeviceClass::from_dtype(" Mobile"), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_dtype("DESKTOP"), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_dtype("Unknown"), DeviceClass::Other);
        assert_eq!(DeviceClass::from_dtype("tablet"), DeviceClass::Other);
    }
}
