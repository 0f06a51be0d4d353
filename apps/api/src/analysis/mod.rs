// Delivery analysis: everything measurable about HOW an answer was spoken.
// Implements: Hangul syllable counting, filler-word detection, speech-rate
// bands, and the evaluate-delivery endpoint with its fallback discipline.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod fallback;
pub mod fillers;
pub mod handlers;
pub mod korean;
pub mod prompts;
pub mod speech_rate;

// Re-export the pure analysis API consumed by other modules (session, tests).
pub use fallback::{degraded_analysis, heuristic_analysis};
pub use fillers::filler_word_count;
pub use korean::syllable_count;
pub use speech_rate::{filler_advice, speech_rate, speed_advice};
