use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::llm_client::schema::{FieldDef, FieldType, SchemaDescriptor};
use crate::pipeline::fields::{integer_field, string_field, string_list_field, FieldError};
use crate::pipeline::{Assessment, TaskKind};

pub const MAX_MATCH_SCORE: i64 = 100;

const RESUME_FIELDS: &[FieldDef] = &[
    FieldDef {
        name: "match_score",
        field_type: FieldType::Integer,
        description: "How well the CV matches the job description, from 0 to 100.",
        required: true,
    },
    FieldDef {
        name: "summary",
        field_type: FieldType::String,
        description: "A short narrative summary of the candidate's fit for the role.",
        required: true,
    },
    FieldDef {
        name: "strengths",
        field_type: FieldType::StringArray,
        description: "Requirements and qualities the candidate clearly meets, one item each.",
        required: true,
    },
    FieldDef {
        name: "missing_requirements",
        field_type: FieldType::StringArray,
        description: "Job requirements the CV does not show, one item each. Empty if none.",
        required: true,
    },
    FieldDef {
        name: "verdict",
        field_type: FieldType::String,
        description: "Overall recommendation, e.g. 'strong match', 'possible match', 'not a match'.",
        required: true,
    },
];

/// Model assessment of one CV against the job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAssessment {
    pub match_score: Option<u8>,
    pub summary: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub missing_requirements: Option<Vec<String>>,
    pub verdict: Option<String>,
}

impl Assessment for ResumeAssessment {
    const KIND: TaskKind = TaskKind::ScoreResume;
    const SCHEMA: SchemaDescriptor = SchemaDescriptor::new(RESUME_FIELDS);

    fn from_object(object: &Map<String, Value>) -> Result<Self, FieldError> {
        let match_score = integer_field(object, "match_score")?
            .map(|score| {
                u8::try_from(score)
                    .ok()
                    .filter(|s| i64::from(*s) <= MAX_MATCH_SCORE)
                    .ok_or_else(|| {
                        FieldError::new("match_score", format!("must be between 0 and 100, got {score}"))
                    })
            })
            .transpose()?;

        Ok(ResumeAssessment {
            match_score,
            summary: string_field(object, "summary")?,
            strengths: string_list_field(object, "strengths")?,
            missing_requirements: string_list_field(object, "missing_requirements")?,
            verdict: string_field(object, "verdict")?,
        })
    }
}
