mod note;

pub use note::Note;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// Parse a stored creation timestamp.
///
/// Accepts RFC 3339 as well as naive ISO-8601 (no offset), which older
/// documents were written with. Naive values are read as local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T08:00:00+00:00");
    }

    #[test]
    fn test_parse_naive_as_local() {
        let dt = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        let local = dt.with_timezone(&Local).naive_local();
        assert_eq!(local.to_string(), "2024-05-01 10:00:00.123456");
    }

    #[test]
    fn test_parse_naive_without_fraction() {
        assert!(parse_timestamp("2024-05-01T10:00:00").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
