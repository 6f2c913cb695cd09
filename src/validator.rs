//! Reading validation.
//!
//! Turns a loosely typed [`ReadingCandidate`] into a normalized [`Reading`],
//! or a [`ValidationError`] listing every rule the candidate broke. Pure: no
//! I/O, no clock.

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{ValidationError, Violation};
use crate::models::{Reading, ReadingCandidate};

pub const MAX_DEVICE_ID_LEN: usize = 50;
pub const NITROGEN_RANGE: RangeInclusive<f64> = 0.0..=1000.0;
pub const PHOSPHORUS_RANGE: RangeInclusive<f64> = 0.0..=500.0;
pub const PH_RANGE: RangeInclusive<f64> = 0.0..=14.0;

// ---

/// Validate a candidate reading.
///
/// Violations are collected in field order (`deviceId`, `timestamp`,
/// `nitrogen`, `phosphorus`, `ph`); a missing field yields
/// [`Violation::MissingField`] and skips that field's other checks.
pub fn validate(candidate: &ReadingCandidate) -> Result<Reading, ValidationError> {
    // ---
    let mut violations = Vec::new();

    let device_id = match &candidate.device_id {
        None => {
            violations.push(Violation::MissingField("deviceId"));
            None
        }
        Some(v) => parse_device_id(v).or_else(|| {
            violations.push(Violation::InvalidDeviceId);
            None
        }),
    };

    let timestamp = match &candidate.timestamp {
        None => {
            violations.push(Violation::MissingField("timestamp"));
            None
        }
        Some(v) => parse_timestamp(v).or_else(|| {
            violations.push(Violation::InvalidTimestamp);
            None
        }),
    };

    let nitrogen = check_measure(
        &candidate.nitrogen,
        "nitrogen",
        &NITROGEN_RANGE,
        Violation::NitrogenOutOfRange,
        &mut violations,
    );
    let phosphorus = check_measure(
        &candidate.phosphorus,
        "phosphorus",
        &PHOSPHORUS_RANGE,
        Violation::PhosphorusOutOfRange,
        &mut violations,
    );
    let ph = check_measure(
        &candidate.ph,
        "ph",
        &PH_RANGE,
        Violation::PhOutOfRange,
        &mut violations,
    );

    match (device_id, timestamp, nitrogen, phosphorus, ph) {
        (Some(device_id), Some(timestamp), Some(nitrogen), Some(phosphorus), Some(ph))
            if violations.is_empty() =>
        {
            Ok(Reading {
                device_id,
                timestamp,
                nitrogen,
                phosphorus,
                ph,
            })
        }
        _ => Err(ValidationError { violations }),
    }
}

fn parse_device_id(value: &Value) -> Option<String> {
    // ---
    let trimmed = value.as_str()?.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_DEVICE_ID_LEN {
        return None;
    }
    Some(trimmed.to_string())
}

/// Date-time layouts carrying an offset. `%#z` takes `Z`, `+02`, `+0200`
/// and `+02:00`.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Date-time layouts without an offset, taken as UTC.
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Accepts ISO-8601 date-times with or without an offset (no offset means
/// UTC), with `T` or a space between date and time, with or without seconds,
/// or a bare ISO date (midnight UTC).
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    // ---
    let text = value.as_str()?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// JSON numbers are taken as-is; numeric strings are parsed. Anything else,
/// including NaN and infinities, fails the range check.
fn parse_measure(value: &Value) -> Option<f64> {
    // ---
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn check_measure(
    field: &Option<Value>,
    name: &'static str,
    range: &RangeInclusive<f64>,
    out_of_range: Violation,
    violations: &mut Vec<Violation>,
) -> Option<f64> {
    // ---
    let Some(value) = field else {
        violations.push(Violation::MissingField(name));
        return None;
    };
    match parse_measure(value) {
        Some(n) if range.contains(&n) => Some(n),
        _ => {
            violations.push(out_of_range);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn candidate(body: Value) -> ReadingCandidate {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "deviceId": "GH001",
            "timestamp": "2024-01-01T00:00:00Z",
            "nitrogen": 250,
            "phosphorus": 45,
            "ph": 6.5
        })
    }

    #[test]
    fn test_accepts_valid_reading() {
        // ---
        let reading = validate(&candidate(valid_body())).unwrap();
        assert_eq!(reading.device_id, "GH001");
        assert_eq!(reading.timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(reading.nitrogen, 250.0);
        assert_eq!(reading.phosphorus, 45.0);
        assert_eq!(reading.ph, 6.5);
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        // ---
        for field in ["deviceId", "timestamp", "nitrogen", "phosphorus", "ph"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let err = validate(&candidate(body)).unwrap_err();
            assert_eq!(err.violations, vec![Violation::MissingField(field)]);
            assert_eq!(err.codes(), vec!["missing-field"]);
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        // ---
        let mut body = valid_body();
        body["ph"] = Value::Null;
        let err = validate(&candidate(body)).unwrap_err();
        assert_eq!(err.violations, vec![Violation::MissingField("ph")]);
    }

    #[test]
    fn test_device_id_rules() {
        // ---
        let mut body = valid_body();
        body["deviceId"] = json!("   ");
        assert_eq!(
            validate(&candidate(body.clone())).unwrap_err().violations,
            vec![Violation::InvalidDeviceId]
        );

        body["deviceId"] = json!("x".repeat(51));
        assert_eq!(
            validate(&candidate(body.clone())).unwrap_err().violations,
            vec![Violation::InvalidDeviceId]
        );

        body["deviceId"] = json!(42);
        assert!(validate(&candidate(body.clone())).is_err());

        body["deviceId"] = json!(format!("  {}  ", "y".repeat(50)));
        let reading = validate(&candidate(body)).unwrap();
        assert_eq!(reading.device_id, "y".repeat(50));
    }

    #[test]
    fn test_timestamp_forms() {
        // ---
        let mut body = valid_body();
        for ok in [
            "2024-01-01T00:00:00Z",
            "2024-01-01T02:00:00+02:00",
            "2024-01-01T00:00:00.000Z",
            "2024-01-01T00:00:00",
            "2024-01-01T00:00Z",
            "2024-01-01T02:00+02:00",
            "2024-01-01T02:00:00+0200",
            "2024-01-01T02:00:00.250+0200",
            "2024-01-01 00:00:00",
            "2024-01-01 00:00",
            "2024-01-01 02:00:00+02:00",
            "2024-01-01",
        ] {
            body["timestamp"] = json!(ok);
            let reading = validate(&candidate(body.clone())).unwrap();
            assert_eq!(
                reading.timestamp,
                "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
                    + chrono::Duration::milliseconds(if ok.contains(".250") { 250 } else { 0 }),
                "{ok}"
            );
        }

        for bad in [
            "yesterday",
            "2024-13-01T00:00:00Z",
            "2024-01-01T25:00Z",
            "",
        ] {
            body["timestamp"] = json!(bad);
            let err = validate(&candidate(body.clone())).unwrap_err();
            assert_eq!(err.violations, vec![Violation::InvalidTimestamp], "{bad}");
        }
    }

    #[test]
    fn test_collects_all_range_violations() {
        // ---
        let body = json!({
            "deviceId": "GH001",
            "timestamp": "2024-01-01T00:00:00Z",
            "nitrogen": 1000.5,
            "phosphorus": -1,
            "ph": 14.01
        });
        let err = validate(&candidate(body)).unwrap_err();
        assert_eq!(
            err.codes(),
            vec![
                "nitrogen-out-of-range",
                "phosphorus-out-of-range",
                "ph-out-of-range"
            ]
        );
    }

    #[test]
    fn test_mixed_violations_in_field_order() {
        // ---
        let body = json!({ "deviceId": "", "timestamp": "nope", "ph": 20 });
        let err = validate(&candidate(body)).unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                Violation::InvalidDeviceId,
                Violation::InvalidTimestamp,
                Violation::MissingField("nitrogen"),
                Violation::MissingField("phosphorus"),
                Violation::PhOutOfRange,
            ]
        );
    }

    #[test]
    fn test_boundaries_accepted_exactly() {
        // ---
        for (n, p, ph) in [(0.0, 0.0, 0.0), (1000.0, 500.0, 14.0), (200.25, 33.3, 6.99)] {
            let mut body = valid_body();
            body["nitrogen"] = json!(n);
            body["phosphorus"] = json!(p);
            body["ph"] = json!(ph);
            let reading = validate(&candidate(body)).unwrap();
            assert_eq!((reading.nitrogen, reading.phosphorus, reading.ph), (n, p, ph));
        }
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        // ---
        let mut body = valid_body();
        body["nitrogen"] = json!("180.5");
        body["ph"] = json!("abc");
        let err = validate(&candidate(body.clone())).unwrap_err();
        assert_eq!(err.violations, vec![Violation::PhOutOfRange]);

        body["ph"] = json!(" 6.2 ");
        let reading = validate(&candidate(body)).unwrap();
        assert_eq!(reading.nitrogen, 180.5);
        assert_eq!(reading.ph, 6.2);
    }

    #[test]
    fn test_non_finite_text_rejected() {
        // ---
        let mut body = valid_body();
        body["nitrogen"] = json!("NaN");
        body["phosphorus"] = json!("inf");
        let err = validate(&candidate(body)).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::NitrogenOutOfRange, Violation::PhosphorusOutOfRange]
        );
    }
}
