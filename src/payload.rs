//! Parsing of decoded QR payloads.
//!
//! Check-in QR codes carry newline-separated `Key: Value` pairs, often as
//! JSON-style fragments with quoted keys and values. Only two keys are
//! recognized: `Name` and `Event Id`. Everything else is ignored, and a
//! payload with neither key still yields a (fully unset) record — the
//! verification service decides what to do with missing fields.

/// The two fields extracted from a decoded QR payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRecord {
    /// Attendee name, if the payload carried a `Name` line
    pub name: Option<String>,
    /// Event identifier, if the payload carried an `Event Id` line
    pub event_id: Option<String>,
}

impl ScanRecord {
    /// True when no recognized field was present in the payload
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.event_id.is_none()
    }
}

const NAME_KEY: &str = "Name";
const EVENT_ID_KEY: &str = "Event Id";

/// Extract the recognized fields from raw decoded text.
///
/// Lines are trimmed and stripped of quote characters (so `"Name": "Jane"`
/// parses the same as `Name: Jane`), then split on the first colon; the
/// value keeps any further colons verbatim. Key matching is exact and case
/// sensitive, and the last occurrence of a duplicate key wins.
///
/// Malformed input never fails: unrecognized lines are skipped, missing
/// keys leave their field unset.
pub fn parse_scan_payload(raw: &str) -> ScanRecord {
    let mut record = ScanRecord::default();

    for line in raw.lines() {
        let line = line.trim().replace('"', "");

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        match key.trim() {
            NAME_KEY => record.name = Some(value.trim().to_string()),
            EVENT_ID_KEY => record.event_id = Some(value.trim().to_string()),
            _ => {}
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_fields() {
        let record = parse_scan_payload("Name: Jane Doe\nEvent Id: EVT-42");
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.event_id.as_deref(), Some("EVT-42"));
    }

    #[test]
    fn test_parse_quoted_json_fragment() {
        let record = parse_scan_payload("\"Name\": \"Jane Doe\"\n\"Event Id\": \"EVT-42\"");
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.event_id.as_deref(), Some("EVT-42"));
    }

    #[test]
    fn test_parse_strips_surrounding_whitespace() {
        let record = parse_scan_payload("  Name :   Jane Doe  \n  Event Id:EVT-42  ");
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.event_id.as_deref(), Some("EVT-42"));
    }

    #[test]
    fn test_parse_value_keeps_colons() {
        let record = parse_scan_payload("Event Id: EVT:2024:42");
        assert_eq!(record.event_id.as_deref(), Some("EVT:2024:42"));
    }

    #[test]
    fn test_parse_garbage_yields_empty_record() {
        let record = parse_scan_payload("Garbage QR");
        assert!(record.is_empty());

        let record = parse_scan_payload("");
        assert!(record.is_empty());
    }

    #[test]
    fn test_parse_keys_are_case_sensitive() {
        let record = parse_scan_payload("name: Jane\nEVENT ID: EVT-42");
        assert!(record.is_empty());
    }

    #[test]
    fn test_parse_unrecognized_keys_ignored() {
        let record = parse_scan_payload("Name: Jane\nTicket: A-7\nEvent Id: EVT-42");
        assert_eq!(record.name.as_deref(), Some("Jane"));
        assert_eq!(record.event_id.as_deref(), Some("EVT-42"));
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let record = parse_scan_payload("Name: First\nName: Second");
        assert_eq!(record.name.as_deref(), Some("Second"));
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let record = parse_scan_payload("Name: Jane\r\nEvent Id: EVT-42\r\n");
        assert_eq!(record.name.as_deref(), Some("Jane"));
        assert_eq!(record.event_id.as_deref(), Some("EVT-42"));
    }

    #[test]
    fn test_parse_is_idempotent_over_reconstruction() {
        let record = parse_scan_payload("\"Name\": \"Jane Doe\"\nEvent Id: EVT-42");
        let reconstructed = format!(
            "Name: {}\nEvent Id: {}",
            record.name.as_deref().unwrap(),
            record.event_id.as_deref().unwrap()
        );
        assert_eq!(parse_scan_payload(&reconstructed), record);
    }
}
