use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::llm_client::schema::{FieldDef, FieldType, SchemaDescriptor};
use crate::pipeline::fields::{string_field, FieldError};
use crate::pipeline::{Assessment, EnrichedRecord, TaskKind};

/// Fixed signature every non-spam reply ends with.
pub const SIGNATURE: &str = "EasyAgents support team";

/// Body used for spam; the only non-empty body a spam record may carry.
pub const SPAM_BODY: &str = "-";

/// Email category. The model must pick exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Support,
    Complaint,
    General,
    Promo,
    Spam,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::Support,
        Classification::Complaint,
        Classification::General,
        Classification::Promo,
        Classification::Spam,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Support => "support",
            Classification::Complaint => "complaint",
            Classification::General => "general",
            Classification::Promo => "promo",
            Classification::Spam => "spam",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("'{s}' is not one of support, complaint, general, promo, spam"))
    }
}

const EMAIL_FIELDS: &[FieldDef] = &[
    FieldDef {
        name: "classification",
        field_type: FieldType::String,
        description: "The classified category of the email: support, complaint, general, promo, or spam.",
        required: true,
    },
    FieldDef {
        name: "subject",
        field_type: FieldType::String,
        description: "A concise subject line for the generated reply.",
        required: true,
    },
    FieldDef {
        name: "body",
        field_type: FieldType::String,
        description: "The full body of the reply, including the signature 'EasyAgents support team' and written in the original email's language. If the email is classified as spam, this field should be empty or contain a single dash: '-'.",
        required: true,
    },
];

/// Classification plus drafted reply for one email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailReply {
    pub classification: Option<Classification>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl Assessment for EmailReply {
    const KIND: TaskKind = TaskKind::ClassifyEmail;
    const SCHEMA: SchemaDescriptor = SchemaDescriptor::new(EMAIL_FIELDS);

    fn from_object(object: &Map<String, Value>) -> Result<Self, FieldError> {
        let classification = string_field(object, "classification")?
            .map(|raw| raw.parse::<Classification>())
            .transpose()
            .map_err(|reason| FieldError::new("classification", reason))?;

        let mut reply = EmailReply {
            classification,
            subject: string_field(object, "subject")?,
            body: string_field(object, "body")?,
        };
        reply.enforce_spam_policy();
        Ok(reply)
    }
}

impl EmailReply {
    /// Spam never gets a reply: any body other than empty or `-` becomes `-`.
    fn enforce_spam_policy(&mut self) {
        if self.classification != Some(Classification::Spam) {
            return;
        }
        let compliant = self
            .body
            .as_deref()
            .map_or(true, |b| b.trim().is_empty() || b.trim() == SPAM_BODY);
        if !compliant {
            warn!("Model drafted a reply for spam; replacing body with '{SPAM_BODY}'");
            self.body = Some(SPAM_BODY.to_string());
        }
    }
}

/// One processed email as stored in the append log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub original_email: String,
    pub llm_response: EnrichedRecord<EmailReply>,
}
