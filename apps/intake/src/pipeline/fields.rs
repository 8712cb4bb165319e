//! Typed lookups over the model's untyped JSON object.
//!
//! Every helper returns `Ok(None)` for an absent or `null` field and `Err` only
//! when the field is present with the wrong JSON type.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

pub fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, FieldError> {
    match present(object, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FieldError::new(
            field,
            format!("must be a string, got {}", type_name(other)),
        )),
    }
}

/// Accepts JSON integers and integral floats (`85.0`).
pub fn integer_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, FieldError> {
    match present(object, field) {
        None => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                _ => Err(FieldError::new(field, format!("must be an integer, got {n}"))),
            }
        }
        Some(other) => Err(FieldError::new(
            field,
            format!("must be an integer, got {}", type_name(other)),
        )),
    }
}

pub fn string_list_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, FieldError> {
    match present(object, field) {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(FieldError::new(
                    field,
                    format!("must contain only strings, found {}", type_name(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(FieldError::new(
            field,
            format!("must be an array of strings, got {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_absent_and_null_are_none() {
        let obj = object(json!({ "a": null }));
        assert_eq!(string_field(&obj, "a").unwrap(), None);
        assert_eq!(string_field(&obj, "b").unwrap(), None);
        assert_eq!(integer_field(&obj, "a").unwrap(), None);
        assert_eq!(string_list_field(&obj, "b").unwrap(), None);
    }

    #[test]
    fn test_string_field_rejects_number() {
        let obj = object(json!({ "subject": 12 }));
        let err = string_field(&obj, "subject").unwrap_err();
        assert_eq!(err.field, "subject");
        assert!(err.to_string().contains("must be a string, got number"));
    }

    #[test]
    fn test_integer_field_accepts_integral_float() {
        let obj = object(json!({ "score": 85.0, "bad": 85.5 }));
        assert_eq!(integer_field(&obj, "score").unwrap(), Some(85));
        assert!(integer_field(&obj, "bad").is_err());
    }

    #[test]
    fn test_integer_field_rejects_numeric_string() {
        let obj = object(json!({ "score": "85" }));
        assert!(integer_field(&obj, "score").is_err());
    }

    #[test]
    fn test_string_list_field() {
        let obj = object(json!({ "ok": ["a", "b"], "mixed": ["a", 1], "scalar": "a" }));
        assert_eq!(
            string_list_field(&obj, "ok").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(string_list_field(&obj, "mixed").is_err());
        assert!(string_list_field(&obj, "scalar").is_err());
    }
}
