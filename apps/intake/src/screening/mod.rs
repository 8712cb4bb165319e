// CV screening: score each CV against a job description and write a JSON
// result plus a Markdown report per CV.
// All LLM calls go through llm_client via the shared pipeline.

pub mod artifacts;
pub mod batch;
pub mod models;
pub mod prompts;
pub mod report;
pub mod source;
