use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when LLM_API_KEY is unset. Every endpoint must keep working
    /// without it by answering from the local heuristics.
    pub llm: Option<LlmClient>,
}
