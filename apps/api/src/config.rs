use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; the service runs fully offline without an LLM key.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer key for the LLM/transcription provider. `None` switches every
    /// endpoint to its deterministic local fallback.
    pub llm_api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API.
    pub llm_api_url: String,
    /// Language hint sent with transcription requests.
    pub speech_language: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            speech_language: std::env::var("SPEECH_LANGUAGE").unwrap_or_else(|_| "ko".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_offline_friendly() {
        std::env::remove_var("LLM_API_KEY");
        std::env::remove_var("LLM_API_URL");
        std::env::remove_var("SPEECH_LANGUAGE");
        std::env::remove_var("PORT");
        let config = Config::from_env().unwrap();
        assert!(config.llm_api_key.is_none());
        assert_eq!(config.llm_api_url, "https://api.openai.com/v1");
        assert_eq!(config.speech_language, "ko");
        assert_eq!(config.port, 8080);
    }
}
