//! Lenient timestamp parsing for document fields.
//!
//! Documents written by mobile clients carry timestamps either as RFC 3339
//! strings, as `{ "seconds", "nanoseconds" }` maps, or as epoch millis.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

/// Parse any supported timestamp representation.
pub fn parse(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Object(map) => {
            let secs = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(secs, u32::try_from(nanos).ok()?)
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// `deserialize_with` helper for optional timestamp fields.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse(&v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse(&json!("2024-05-01T10:00:00Z")).unwrap();
        assert_eq!(ts.timestamp(), 1_714_557_600);
    }

    #[test]
    fn test_parse_seconds_map() {
        let ts = parse(&json!({"seconds": 1_714_557_600, "nanoseconds": 0})).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(parse(&json!({"_seconds": 10})).is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse(&json!("next tuesday")).is_none());
        assert!(parse(&json!(true)).is_none());
    }
}
