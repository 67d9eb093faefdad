//! Coercion helpers for loosely-typed JSON request bodies.
//!
//! Create and update endpoints accept a JSON object whose keys may be
//! missing, `null`, or carry values of a looser type than the target field
//! (numbers as strings, for instance). These helpers validate and coerce
//! one field at a time and report failures as [`CoreError::Validation`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Timestamp;

/// A decoded request body: field name to untyped value.
pub type Payload = serde_json::Map<String, Value>;

/// Date-time layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Interpret a request body as a [`Payload`]. Anything but an object is rejected.
pub fn into_payload(value: Value) -> Result<Payload, CoreError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::Validation(
            "Request body must be a JSON object".into(),
        )),
    }
}

/// Return the value under the first of `keys` that is present.
pub fn lookup<'a>(payload: &'a Payload, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| payload.get(*key))
}

/// Return the value under the first of `keys` that is present and not `null`.
pub fn lookup_non_null<'a>(payload: &'a Payload, keys: &[&str]) -> Option<&'a Value> {
    lookup(payload, keys).filter(|v| !v.is_null())
}

/// Loose truthiness: `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Coerce a scalar to a string. Numbers and booleans are stringified.
pub fn string_value(field: &str, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(CoreError::Validation(format!(
            "Field '{field}' must be a string"
        ))),
    }
}

/// Like [`string_value`], but `null` maps to `None`.
pub fn optional_string(field: &str, value: &Value) -> Result<Option<String>, CoreError> {
    match value {
        Value::Null => Ok(None),
        other => string_value(field, other).map(Some),
    }
}

/// Coerce a value to an integer.
///
/// Accepts integers, floats (truncated toward zero) and numeric strings.
pub fn integer_value(field: &str, value: &Value) -> Result<i64, CoreError> {
    let invalid = || CoreError::Validation(format!("Field '{field}' must be an integer"));

    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Parse a timestamp string. See [`parse_timestamp`] for accepted layouts.
pub fn timestamp_value(field: &str, value: &Value) -> Result<Timestamp, CoreError> {
    match value {
        Value::String(s) => parse_timestamp(s).ok_or_else(|| {
            CoreError::Validation(format!("Field '{field}' is not a valid date: '{s}'"))
        }),
        _ => Err(CoreError::Validation(format!(
            "Field '{field}' must be a date string"
        ))),
    }
}

/// Parse RFC 3339, a naive date-time (UTC) or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> Payload {
        into_payload(value).unwrap()
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(into_payload(json!([1, 2])).is_err());
        assert!(into_payload(json!("name")).is_err());
    }

    #[test]
    fn lookup_prefers_first_key() {
        let p = payload(json!({"Status": "WIP", "status": "Finished"}));
        assert_eq!(lookup(&p, &["status", "Status"]), Some(&json!("Finished")));
        assert_eq!(lookup(&p, &["missing", "Status"]), Some(&json!("WIP")));
        assert_eq!(lookup(&p, &["missing"]), None);
    }

    #[test]
    fn lookup_non_null_skips_null() {
        let p = payload(json!({"notes": null}));
        assert!(lookup(&p, &["notes"]).is_some());
        assert!(lookup_non_null(&p, &["notes"]).is_none());
    }

    #[test]
    fn truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!("0"), json!([])] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("2024-01-01"), json!([1])] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(integer_value("quantity", &json!(3)).unwrap(), 3);
        assert_eq!(integer_value("quantity", &json!("12")).unwrap(), 12);
        assert_eq!(integer_value("quantity", &json!(4.9)).unwrap(), 4);
        assert_eq!(integer_value("quantity", &json!(" 7 ")).unwrap(), 7);
        assert!(integer_value("quantity", &json!("many")).is_err());
        assert!(integer_value("quantity", &json!(true)).is_err());
    }

    #[test]
    fn string_coercion() {
        assert_eq!(string_value("name", &json!("Wool")).unwrap(), "Wool");
        assert_eq!(string_value("color", &json!(42)).unwrap(), "42");
        assert!(string_value("name", &json!({"a": 1})).is_err());
        assert_eq!(optional_string("notes", &json!(null)).unwrap(), None);
    }

    #[test]
    fn timestamp_layouts() {
        let rfc = parse_timestamp("2024-03-01T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let naive = parse_timestamp("2024-03-01T10:30").unwrap();
        assert_eq!((naive.hour(), naive.minute()), (10, 30));

        let spaced = parse_timestamp("2024-03-01 10:30:15").unwrap();
        assert_eq!(spaced.second(), 15);

        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 1));
        assert_eq!(date.hour(), 0);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn malformed_timestamp_is_validation_error() {
        let err = timestamp_value("started_at", &json!("soon")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
