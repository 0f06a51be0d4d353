// Question generation: tailored interview questions from a job posting and
// resume text, with a fixed sample set when no LLM is configured.

pub mod handlers;
pub mod prompts;
pub mod samples;

pub use samples::sample_questions;
