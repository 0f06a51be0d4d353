// Content evaluation: scores WHAT was said, one answer against one question.
// LLM-backed when configured, deterministic length heuristic otherwise.

pub mod handlers;
pub mod prompts;
pub mod scoring;

// Re-export the scoring core shared with the session engine.
pub use scoring::{
    heuristic_evaluation, NO_ANSWER_FEEDBACK, NO_ANSWER_PLACEHOLDER, SKIPPED_PLACEHOLDER,
};
