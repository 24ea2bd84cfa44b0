// Interview flow: resume extraction, question generation, follow-ups,
// answer evaluation, and the final report.
// All model calls go through llm_client::ModelRuntime.

pub mod evaluation;
pub mod followup;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod resume;
