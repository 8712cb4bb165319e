// All LLM prompt constants for the email module.

use crate::email::models::SIGNATURE;
use crate::pipeline::{TaskKind, TaskRequest};

/// Email triage prompt template. Replace `{signature}` and `{email_body}` before sending.
pub const CLASSIFY_PROMPT_TEMPLATE: &str = "\
Analyze the following email and output a JSON object containing the classification, a subject, and the reply body.
1. Classify it as exactly one of: support, complaint, general, promo, or spam.
2. Write a short, suitable reply in the same language as the email body.
3. End the reply with the signature: '{signature}'.
4. If classified as 'spam', do NOT write a reply; the 'body' field must be empty or contain only a dash ('-').
5. Create a concise 'subject' line for the reply.

Email: {email_body}";

/// Builds the classification prompt. The email body is passed through as-is.
pub fn build_prompt(email_body: &str) -> String {
    CLASSIFY_PROMPT_TEMPLATE
        .replace("{signature}", SIGNATURE)
        .replace("{email_body}", email_body)
}

/// Email requests run at the service's default temperature.
pub fn request(email_body: &str) -> TaskRequest {
    TaskRequest {
        kind: TaskKind::ClassifyEmail,
        prompt: build_prompt(email_body),
        temperature: None,
    }
}
