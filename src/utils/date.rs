use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Timestamp layout used in snapshots. The fraction is only written when
/// non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Lenient timestamp parser for source dates.
///
/// Accepts plain dates, naive date-times (space or `T` separated, optional
/// fraction) and RFC 3339 with an offset, which is normalized to UTC.
/// Anything else yields `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "Unknown",
    }
}

/// Month from a number (`3`, `03`) or an English name/abbreviation
/// (`March`, `mar`).
pub fn parse_month(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }

    let lower = s.to_lowercase();
    if lower.len() < 3 {
        return None;
    }

    MONTH_NAMES
        .iter()
        .position(|name| name.to_lowercase().starts_with(&lower))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_supported_layouts() {
        let plain = parse_timestamp("2025-03-14").unwrap();
        assert_eq!((plain.year(), plain.month(), plain.day()), (2025, 3, 14));
        assert_eq!(plain.hour(), 0);

        let spaced = parse_timestamp("2025-03-14 08:30:15").unwrap();
        assert_eq!(spaced.minute(), 30);

        assert!(parse_timestamp("2025-03-14T08:30:15.250").is_some());
        assert!(parse_timestamp("2025-03-14 08:30").is_some());
    }

    #[test]
    fn rfc3339_is_converted_to_utc() {
        let dt = parse_timestamp("2025-03-01T01:00:00+02:00").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour()), (2, 28, 23));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2025-13-01").is_none());
    }

    #[test]
    fn month_parsing() {
        assert_eq!(parse_month("3"), Some(3));
        assert_eq!(parse_month("03"), Some(3));
        assert_eq!(parse_month("mar"), Some(3));
        assert_eq!(parse_month("December"), Some(12));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("ju"), None);
        assert_eq!(month_name(2), "February");
    }
}
