//! Timestamp parsing shared by course metadata and tracking events

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Format used for timestamps in report lines
pub const REPORT_TIME_FORMAT: &str = "%m/%d/%Y %H:%M";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse the timestamp shapes found in tracking logs and course metadata.
///
/// RFC 3339 is tried first, then a few offset and naive layouts. Naive values
/// are read as UTC. The parsed offset is kept so formatted output shows the
/// wall-clock time that was logged.
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }

    let utc = FixedOffset::east_opt(0)?;
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return utc.from_local_datetime(&naive).single();
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| utc.from_local_datetime(&naive).single())
}

/// Interpret a millisecond epoch value (extended JSON `$date`).
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|ts| ts.fixed_offset())
}

/// Render a timestamp the way report lines show it.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format(REPORT_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_zulu() {
        let ts = parse_timestamp("2013-01-01T00:00:00Z").unwrap();
        assert_eq!(format_timestamp(&ts), "01/01/2013 00:00");
    }

    #[test]
    fn test_parse_keeps_logged_offset() {
        let ts = parse_timestamp("2013-05-28T14:05:28.123456+02:00").unwrap();
        assert_eq!(format_timestamp(&ts), "05/28/2013 14:05");
    }

    #[test]
    fn test_parse_offset_without_colon() {
        let ts = parse_timestamp("2013-05-28T14:05:28+0000").unwrap();
        assert_eq!(format_timestamp(&ts), "05/28/2013 14:05");
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = parse_timestamp("2013-05-28 09:30:00.5").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(format_timestamp(&ts), "05/28/2013 09:30");
        assert!(parse_timestamp("2013-02-05").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_from_epoch_millis() {
        let ts = from_epoch_millis(1_357_000_000_000).unwrap();
        assert_eq!(format_timestamp(&ts), "01/01/2013 00:26");
    }
}
