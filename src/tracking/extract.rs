//! Best-effort location extraction from raw event payloads
//!
//! The upstream logger truncates long payloads, so the JSON inside `event`
//! frequently cannot be decoded. The location is instead cut out of the raw
//! text: from the first `i4x:` marker up to the next quote.

use crate::location::{Location, LocationResult};

/// Marker that starts an embedded location
pub const LOCATION_MARKER: &str = "i4x:";

/// Slice of `payload` holding the embedded location text, if any.
///
/// A trailing backslash left over from an escaped quote is dropped. When no
/// closing quote exists the rest of the payload is taken.
pub fn extract_location_text(payload: &str) -> Option<&str> {
    let start = payload.find(LOCATION_MARKER)?;
    let rest = &payload[start..];
    let end = rest.find('"').unwrap_or(rest.len());
    Some(rest[..end].trim_end_matches('\\'))
}

/// Extract and parse the embedded location.
///
/// `None` when the payload carries no marker at all.
pub fn extract_location(payload: &str) -> Option<LocationResult<Location>> {
    extract_location_text(payload).map(Location::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_decoded_payload() {
        let payload = r#"{"POST": {"id": ["i4x://org/course/problem/p1"], "data": "<problem/>"}}"#;
        assert_eq!(
            extract_location_text(payload),
            Some("i4x://org/course/problem/p1")
        );
    }

    #[test]
    fn test_extracts_from_truncated_payload() {
        let payload = r#"{"POST": {"id": ["i4x://org/course/html/h1"], "data": "<p>long text that was cut"#;
        let location = extract_location(payload).unwrap().unwrap();
        assert_eq!(location.url(), "i4x://org/course/html/h1");
    }

    #[test]
    fn test_drops_escaped_quote_remnant() {
        let payload = r#"{\"id\": \"i4x://org/course/video/v1\"}"#;
        assert_eq!(extract_location_text(payload), Some("i4x://org/course/video/v1"));
    }

    #[test]
    fn test_takes_rest_when_unterminated() {
        assert_eq!(
            extract_location_text("id=i4x://org/course/html/h1"),
            Some("i4x://org/course/html/h1")
        );
    }

    #[test]
    fn test_no_marker() {
        assert!(extract_location_text(r#"{"POST": {}}"#).is_none());
        assert!(extract_location("").is_none());
    }

    #[test]
    fn test_invalid_embedded_location() {
        let result = extract_location(r#"{"id": "i4x://org/course/problem/bad name"}"#).unwrap();
        assert!(result.is_err());
    }
}
