// Report assembly: related-case summaries, legal citations, prompt templates.
// All completion calls go through llm_client — no direct API calls here.

pub mod handlers;
pub mod law;
pub mod prompts;
