// All LLM prompt constants for the screening module.
// The operator-editable template (prompts/screening.md) frames the task; the
// fixed instructions below are always prepended so the output rules never drift.

use crate::pipeline::{TaskKind, TaskRequest};

pub const JD_PLACEHOLDER: &str = "{jd_text}";
pub const CV_PLACEHOLDER: &str = "{cv_text}";

/// Fixed output rules for CV screening.
pub const SCREENING_INSTRUCTIONS: &str = "\
You are an experienced technical recruiter comparing a candidate CV against a job description.
Return a JSON object with these fields:
1. 'match_score': an integer from 0 to 100 for how well the CV matches the job description.
2. 'summary': a short narrative summary (2-4 sentences) of the candidate's fit.
3. 'strengths': the requirements the candidate clearly meets, one discrete item per entry.
4. 'missing_requirements': the job requirements the CV does not demonstrate, one discrete item per entry. Use an empty list if nothing is missing.
5. 'verdict': an overall recommendation such as 'strong match', 'possible match' or 'not a match'.
Base every statement on the CV text only. Do not invent experience.";

/// Returns the placeholders missing from `template`.
pub fn missing_placeholders(template: &str) -> Vec<&'static str> {
    [JD_PLACEHOLDER, CV_PLACEHOLDER]
        .into_iter()
        .filter(|p| !template.contains(p))
        .collect()
}

/// Builds the screening prompt: fixed instructions, then the template with
/// the job description and CV substituted in. Inputs are not validated.
pub fn build_prompt(template: &str, jd_text: &str, cv_text: &str) -> String {
    let body = template
        .replace(JD_PLACEHOLDER, jd_text)
        .replace(CV_PLACEHOLDER, cv_text);
    format!("{SCREENING_INSTRUCTIONS}\n\n{body}")
}

pub fn request(template: &str, jd_text: &str, cv_text: &str, temperature: f32) -> TaskRequest {
    TaskRequest {
        kind: TaskKind::ScoreResume,
        prompt: build_prompt(template, jd_text, cv_text),
        temperature: Some(temperature),
    }
}
