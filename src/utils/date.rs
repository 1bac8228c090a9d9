use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};

pub const FLEXIBLE: &str = "Flexible";

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Blank input is no date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// `Jan 5, 2025`, or "Flexible" when there is no date.
pub fn format_short(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| FLEXIBLE.to_string())
}

/// `January 5, 2025`, or "Flexible" when there is no date.
pub fn format_long(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| FLEXIBLE.to_string())
}

/// Serde adapter for optional dates that the API may send as `""`, `null`,
/// a timestamp, or a bare date.
pub mod lenient {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}
