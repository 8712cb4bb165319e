//! Response validation and enrichment.
//!
//! `enrich` turns raw model text into either an `EnrichedRecord` (typed result
//! plus host-side fields) or an `ErrorRecord` that keeps the raw text verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::llm_client::strip_json_fences;
use crate::pipeline::{Assessment, TaskKind};

/// Model output merged with host-computed fields.
///
/// `timestamp` is the request time, captured before the model call is issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord<A> {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub result: A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MalformedJson,
    NotAnObject,
    MissingFields,
    InvalidField,
}

/// A model response that could not become an `EnrichedRecord`.
///
/// Never persisted as a success; shown to the operator for diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub task: TaskKind,
    pub reason: RejectReason,
    pub error: String,
    pub raw_output: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    fn new(
        task: TaskKind,
        reason: RejectReason,
        error: impl Into<String>,
        raw_text: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            task,
            reason,
            error: error.into(),
            raw_output: raw_text.to_string(),
            timestamp,
        }
    }
}

/// Parses `raw_text`, checks required fields, maps it onto `A` and stamps it
/// with `requested_at`.
pub fn enrich<A: Assessment>(
    raw_text: &str,
    requested_at: DateTime<Utc>,
) -> Result<EnrichedRecord<A>, ErrorRecord> {
    let reject = |reason, error: String| ErrorRecord::new(A::KIND, reason, error, raw_text, requested_at);

    let value: Value = serde_json::from_str(strip_json_fences(raw_text)).map_err(|e| {
        reject(
            RejectReason::MalformedJson,
            format!("LLM returned invalid JSON: {e}"),
        )
    })?;

    let object = value.as_object().ok_or_else(|| {
        reject(
            RejectReason::NotAnObject,
            "LLM returned JSON that is not an object".to_string(),
        )
    })?;

    let missing = A::SCHEMA.missing_required(object);
    if !missing.is_empty() {
        return Err(reject(
            RejectReason::MissingFields,
            format!("LLM response is missing required fields: {}", missing.join(", ")),
        ));
    }

    for field in A::SCHEMA.fields.iter().filter(|f| !f.required) {
        if object.get(field.name).map_or(true, Value::is_null) {
            warn!("{} response omitted optional field '{}'", A::KIND, field.name);
        }
    }

    let result = A::from_object(object)
        .map_err(|e| reject(RejectReason::InvalidField, format!("LLM response has an invalid field: {e}")))?;

    Ok(EnrichedRecord {
        timestamp: requested_at,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::schema::{FieldDef, FieldType, SchemaDescriptor};
    use crate::pipeline::fields::{integer_field, string_field, FieldError};
    use chrono::TimeZone;
    use serde_json::{json, Map};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Probe {
        name: Option<String>,
        count: Option<i64>,
        note: Option<String>,
    }

    const PROBE_FIELDS: &[FieldDef] = &[
        FieldDef {
            name: "name",
            field_type: FieldType::String,
            description: "",
            required: true,
        },
        FieldDef {
            name: "count",
            field_type: FieldType::Integer,
            description: "",
            required: true,
        },
        FieldDef {
            name: "note",
            field_type: FieldType::String,
            description: "",
            required: false,
        },
    ];

    impl Assessment for Probe {
        const KIND: TaskKind = TaskKind::ClassifyEmail;
        const SCHEMA: SchemaDescriptor = SchemaDescriptor::new(PROBE_FIELDS);

        fn from_object(object: &Map<String, Value>) -> Result<Self, FieldError> {
            Ok(Probe {
                name: string_field(object, "name")?,
                count: integer_field(object, "count")?,
                note: string_field(object, "note")?,
            })
        }
    }

    fn requested_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_response_keeps_model_values_and_request_time() {
        let record = enrich::<Probe>(r#"{"name": "a", "count": 3, "note": "n"}"#, requested_at()).unwrap();
        assert_eq!(record.timestamp, requested_at());
        assert_eq!(
            record.result,
            Probe {
                name: Some("a".to_string()),
                count: Some(3),
                note: Some("n".to_string()),
            }
        );
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let record = enrich::<Probe>(r#"{"name": "a", "count": 3}"#, requested_at()).unwrap();
        assert_eq!(record.result.note, None);
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let raw = "```json\n{\"name\": \"a\", \"count\": 1}\n```";
        assert!(enrich::<Probe>(raw, requested_at()).is_ok());
    }

    #[test]
    fn test_invalid_json_keeps_raw_text_verbatim() {
        let raw = "Sorry, I can't help with that.";
        let err = enrich::<Probe>(raw, requested_at()).unwrap_err();
        assert_eq!(err.reason, RejectReason::MalformedJson);
        assert_eq!(err.raw_output, raw);
        assert_eq!(err.timestamp, requested_at());
        assert!(err.error.starts_with("LLM returned invalid JSON"));
    }

    #[test]
    fn test_fenced_invalid_json_keeps_fences_in_raw_text() {
        let raw = "```json\n{broken\n```";
        let err = enrich::<Probe>(raw, requested_at()).unwrap_err();
        assert_eq!(err.raw_output, raw);
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let err = enrich::<Probe>("[1, 2, 3]", requested_at()).unwrap_err();
        assert_eq!(err.reason, RejectReason::NotAnObject);
    }

    #[test]
    fn test_missing_required_fields_are_listed() {
        let err = enrich::<Probe>(r#"{"count": null}"#, requested_at()).unwrap_err();
        assert_eq!(err.reason, RejectReason::MissingFields);
        assert!(err.error.contains("name, count"));
    }

    #[test]
    fn test_mistyped_field_is_rejected() {
        let err = enrich::<Probe>(r#"{"name": "a", "count": "three"}"#, requested_at()).unwrap_err();
        assert_eq!(err.reason, RejectReason::InvalidField);
        assert!(err.error.contains("count"));
    }

    #[test]
    fn test_record_serializes_timestamp_first_and_flat() {
        let record = enrich::<Probe>(r#"{"name": "a", "count": 3}"#, requested_at()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({ "timestamp": "2024-01-01T10:00:00Z", "name": "a", "count": 3, "note": null })
        );
    }
}
