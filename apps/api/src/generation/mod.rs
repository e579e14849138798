// Resume optimization engine.
// Keyword suggestion, steered synthesis, re-scoring and the optional cover letter.
// All LLM calls go through llm_client; nothing here knows which provider is behind it.

pub mod cover_letter;
pub mod generator;
pub mod handlers;
pub mod keywords;
pub mod overlap;
pub mod pipeline;
pub mod prompts;
