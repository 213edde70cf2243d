//! Custom serde helpers for backend wire formats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a timestamp the way the quote backend emits them: RFC 3339,
/// `YYYY-MM-DD HH:MM:SS`, bare `YYYY-MM-DD` (midnight UTC) or epoch millis.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Deserializes an optional, loosely-formatted timestamp into
/// `Option<DateTime<Utc>>`. Unrecognised values become `None` instead of
/// failing the whole quote.
pub mod lenient_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        let parsed = match raw {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => match serde_json::from_value::<Raw>(value) {
                Ok(Raw::Millis(ms)) => DateTime::<Utc>::from_timestamp_millis(ms),
                Ok(Raw::Text(s)) => super::parse_datetime(&s),
                Err(_) => None,
            },
        };
        Ok(parsed)
    }
}
