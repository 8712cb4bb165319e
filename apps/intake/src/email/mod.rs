// Email triage: classify an incoming email, draft a reply, keep an append log.
// All LLM calls go through llm_client via the shared pipeline.

pub mod desk;
pub mod log;
pub mod models;
pub mod prompts;
