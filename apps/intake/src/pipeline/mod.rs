// Structured extraction pipeline: prompt → model call → validate → enrich.
// Task modules (email, screening) supply the schema, prompt and typed record;
// this module owns the shared flow.

pub mod enrich;
pub mod fields;

use std::fmt;

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::schema::SchemaDescriptor;
use crate::llm_client::ModelInvoker;

pub use enrich::{enrich, EnrichedRecord, ErrorRecord, RejectReason};
use fields::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ClassifyEmail,
    ScoreResume,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::ClassifyEmail => f.write_str("classify_email"),
            TaskKind::ScoreResume => f.write_str("score_resume"),
        }
    }
}

/// One unit of work for the model: the composed prompt plus call settings.
/// Built by a task's prompt builder, discarded once the pipeline returns.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    pub kind: TaskKind,
    pub prompt: String,
    pub temperature: Option<f32>,
}

/// Typed model output for one task kind.
///
/// `from_object` is the only place untyped JSON becomes a task record. It is
/// called after required-field presence has been checked against `SCHEMA`.
pub trait Assessment: Serialize + DeserializeOwned + Sized {
    const KIND: TaskKind;
    const SCHEMA: SchemaDescriptor;

    fn from_object(object: &Map<String, Value>) -> Result<Self, FieldError>;
}

/// Runs one request through the model and the enricher.
///
/// Transport failures come back as `AppError::Llm`, unusable responses as
/// `AppError::MalformedResponse` carrying the `ErrorRecord`.
pub async fn extract<A: Assessment>(
    invoker: &dyn ModelInvoker,
    request: &TaskRequest,
) -> Result<EnrichedRecord<A>, AppError> {
    debug_assert_eq!(request.kind, A::KIND);

    let requested_at = Utc::now();
    info!("Invoking model for {}", request.kind);

    let raw_text = invoker
        .invoke(&request.prompt, &A::SCHEMA, request.temperature)
        .await?;

    enrich::<A>(&raw_text, requested_at).map_err(|record| AppError::MalformedResponse(Box::new(record)))
}
