//! JSON adaptation
//!
//! Builds a [`Substitutions`] bag from a `serde_json` object without touching the
//! source document. `null` members are absent; booleans and numbers are rendered to
//! strings; arrays and objects must hold scalars only.
//!
//! JSON has no date type, so suite files and data files for the command line carry
//! timestamps as epoch milliseconds under fixed member names.

use super::value::{Value, ValueError};
use super::Substitutions;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Convert a JSON object into a substitution bag
pub fn from_json(data: &JsonValue) -> Result<Substitutions, ValueError> {
    let object = match data {
        JsonValue::Object(object) => object,
        other => {
            let error = ValueError::NotAnObject {
                found: json_kind(other).to_string(),
            };
            log_error!(error.error_code(), "Substitutions are not an object",
                "found" => json_kind(other)
            );
            return Err(error);
        }
    };

    let mut substitutions = Substitutions::new();
    for (name, member) in object {
        match normalize_member(name, member) {
            Ok(Some(value)) => substitutions.insert(name.clone(), value),
            Ok(None) => {}
            Err(error) => {
                log_error!(error.error_code(), "Unsupported substitution value",
                    "variable" => name,
                    "found" => json_kind(member)
                );
                return Err(error);
            }
        }
    }

    log_success!(codes::substitution::SUBSTITUTIONS_LOADED,
        "Substitution values loaded",
        "members" => object.len(),
        "defined" => substitutions.len()
    );

    Ok(substitutions)
}

/// Members read as epoch milliseconds by [`from_json_with_timestamps`]
pub const NATIVE_TIMESTAMP_MEMBERS: [&str; 2] = ["nativedate", "nativedatetwo"];

/// Like [`from_json`], but numeric [`NATIVE_TIMESTAMP_MEMBERS`] expand as RFC 3339
/// timestamps, the same text a `chrono::DateTime` value produces. Numbers outside the
/// representable range stay plain numbers.
pub fn from_json_with_timestamps(data: &JsonValue) -> Result<Substitutions, ValueError> {
    let mut substitutions = from_json(data)?;

    for name in NATIVE_TIMESTAMP_MEMBERS {
        let timestamp = data
            .get(name)
            .and_then(epoch_millis)
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        if let Some(timestamp) = timestamp {
            log_debug!("Epoch milliseconds read as timestamp",
                "variable" => name,
                "timestamp" => timestamp
            );
            substitutions.insert(name, timestamp);
        }
    }

    Ok(substitutions)
}

fn epoch_millis(value: &JsonValue) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|millis| millis as i64))
}

/// Classify one top-level member. `Ok(None)` means the variable is absent.
fn normalize_member(name: &str, member: &JsonValue) -> Result<Option<Value>, ValueError> {
    match member {
        JsonValue::Null => Ok(None),
        JsonValue::Array(items) => {
            let items = items
                .iter()
                .map(|item| element_to_string(name, item, "list"))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Value::List(items)))
        }
        JsonValue::Object(pairs) => {
            let pairs = pairs
                .iter()
                .map(|(key, item)| Ok((key.clone(), element_to_string(name, item, "map")?)))
                .collect::<Result<BTreeMap<_, _>, ValueError>>()?;
            Ok(Some(Value::Map(pairs)))
        }
        scalar => Ok(scalar_to_string(scalar).map(Value::String)),
    }
}

fn element_to_string(name: &str, item: &JsonValue, container: &str) -> Result<String, ValueError> {
    scalar_to_string(item).ok_or_else(|| ValueError::UnsupportedValueType {
        name: name.to_string(),
        found: format!("{} inside {}", json_kind(item), container),
    })
}

/// Render a JSON scalar; `None` for null and containers
pub fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_scalars_and_containers() {
        let bag = from_json(&json!({
            "name": "fred",
            "flag": true,
            "count": 6,
            "ratio": 37.76,
            "empty": "",
            "list": ["red", 2, false],
            "keys": {"semi": ";", "n": 1}
        }))
        .unwrap();

        assert_eq!(bag.get("name"), Some(&Value::from("fred")));
        assert_eq!(bag.get("flag"), Some(&Value::from("true")));
        assert_eq!(bag.get("count"), Some(&Value::from("6")));
        assert_eq!(bag.get("ratio"), Some(&Value::from("37.76")));
        assert_eq!(bag.get("empty"), Some(&Value::from("")));
        assert_eq!(bag.get("list"), Some(&Value::from(vec!["red", "2", "false"])));
        assert_eq!(bag.get("keys"), Some(&Value::from([("n", "1"), ("semi", ";")])));
    }

    #[test]
    fn test_null_is_absent() {
        let bag = from_json(&json!({"undef": null, "x": "1"})).unwrap();
        assert!(bag.get("undef").is_none());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_source_is_not_modified() {
        let data = json!({"n": 1, "list": [1, 2]});
        let before = data.clone();
        from_json(&data).unwrap();
        assert_eq!(data, before);
    }

    #[test]
    fn test_nested_containers_are_rejected() {
        assert_matches!(
            from_json(&json!({"deep": [[1]]})),
            Err(ValueError::UnsupportedValueType { name, found }) if name == "deep" && found == "array inside list"
        );
        assert_matches!(
            from_json(&json!({"deep": {"a": {"b": 1}}})),
            Err(ValueError::UnsupportedValueType { found, .. }) if found == "object inside map"
        );
        assert_matches!(
            from_json(&json!({"holes": ["a", null]})),
            Err(ValueError::UnsupportedValueType { found, .. }) if found == "null inside list"
        );
    }

    #[test]
    fn test_epoch_milliseconds_become_timestamps() {
        let bag = from_json_with_timestamps(&json!({
            "nativedate": 1672531200000i64,
            "nativedatetwo": 1672531200000.0,
            "other": 1672531200000i64
        }))
        .unwrap();

        assert_eq!(bag.get("nativedate"), Some(&Value::from("2023-01-01T00:00:00Z")));
        assert_eq!(bag.get("nativedatetwo"), Some(&Value::from("2023-01-01T00:00:00Z")));
        assert_eq!(bag.get("other"), Some(&Value::from("1672531200000")));
    }

    #[test]
    fn test_non_numeric_timestamp_members_are_kept() {
        let bag = from_json_with_timestamps(&json!({
            "nativedate": "yesterday",
            "nativedatetwo": i64::MAX
        }))
        .unwrap();

        assert_eq!(bag.get("nativedate"), Some(&Value::from("yesterday")));
        assert_eq!(bag.get("nativedatetwo"), Some(&Value::from(i64::MAX.to_string())));

        let plain = from_json(&json!({"nativedate": 0})).unwrap();
        assert_eq!(plain.get("nativedate"), Some(&Value::from("0")));
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert_matches!(
            from_json(&json!(["a"])),
            Err(ValueError::NotAnObject { found }) if found == "array"
        );
    }
}
