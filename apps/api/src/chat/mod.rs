// Recruiter chat assistant.
// The resolver picks the remote or local strategy per call; sessions own their transcripts.
// All hosted-model calls go through llm_client; nothing here talks HTTP to the model directly.

pub mod handlers;
pub mod prompts;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod transcript;
