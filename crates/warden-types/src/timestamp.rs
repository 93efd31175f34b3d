//! Lenient timestamp parsing for inventory payloads.
//!
//! The inventory emits ISO-8601 timestamps, sometimes without an offset.
//! Offset-less values are taken to be UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one interpreted as UTC.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` helper for required timestamps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = parse("2024-03-01T12:30:00.123456").unwrap();
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.hour(), 12);

        assert!(parse("2024-03-01 12:30:00").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("yesterday").is_none());
    }
}
