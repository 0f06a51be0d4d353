//! LLM Client — the single point of entry for all upstream AI calls in Rostrum.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All chat-completion and audio-transcription requests MUST go through this
//! module. The provider is any OpenAI-compatible API, selected by base URL.

use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Transcription model for the audio endpoint.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call parameters. Each endpoint pins its own model and token budget
/// next to its prompt constants.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider to enforce a JSON-object response.
    pub json_object: bool,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// Verbose transcription result. `duration` is the provider-measured audio
/// length in seconds, used when the caller did not supply one.
#[derive(Debug, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by all services in Rostrum.
/// Wraps chat completions and audio transcription with retry logic and
/// structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Makes a raw chat-completion call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        opts: ChatOptions<'_>,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let request_body = ChatCompletionRequest {
            model: opts.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
            response_format: opts.json_object.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            match Self::check_status(response).await {
                Ok(response) => {
                    let completion: ChatCompletionResponse = response.json().await?;
                    if let Some(usage) = &completion.usage {
                        debug!(
                            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                            usage.prompt_tokens, usage.completion_tokens
                        );
                    }
                    return Ok(completion);
                }
                Err(LlmError::Api { status, message }) if status == 429 || status >= 500 => {
                    last_error = Some(LlmError::Api { status, message });
                    continue;
                }
                Err(fatal) => return Err(fatal),
            }
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Convenience method that calls the LLM and deserializes the response
    /// content as a JSON object. The prompt must instruct the model to return
    /// valid JSON; surrounding prose or code fences are tolerated.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        opts: ChatOptions<'_>,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system, opts).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let slice = extract_json_object(text).unwrap_or(text);
        serde_json::from_str(slice).map_err(LlmError::Parse)
    }

    /// Like `call_json`, but extracts the first JSON array from the content.
    pub async fn call_json_array<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        opts: ChatOptions<'_>,
    ) -> Result<Vec<T>, LlmError> {
        let response = self.call(prompt, system, opts).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let slice = extract_json_array(text).unwrap_or(text);
        serde_json::from_str(slice).map_err(LlmError::Parse)
    }

    /// Transcribes an audio blob via the provider's transcription endpoint
    /// (`verbose_json` so the response carries the measured duration).
    /// Retries with the same policy as chat calls; the multipart form is
    /// rebuilt per attempt since it cannot be reused.
    pub async fn transcribe(
        &self,
        audio: Bytes,
        file_name: &str,
        mime: &str,
        language: &str,
    ) -> Result<Transcription, LlmError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Transcription attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let part = reqwest::multipart::Part::bytes(audio.to_vec())
                .file_name(file_name.to_string())
                .mime_str(mime)?;
            let form = reqwest::multipart::Form::new()
                .part("file", part)
                .text("model", TRANSCRIPTION_MODEL)
                .text("response_format", "verbose_json")
                .text("language", language.to_string());

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .multipart(form)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            match Self::check_status(response).await {
                Ok(response) => return Ok(response.json().await?),
                Err(LlmError::Api { status, message }) if status == 429 || status >= 500 => {
                    last_error = Some(LlmError::Api { status, message });
                    continue;
                }
                Err(fatal) => return Err(fatal),
            }
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Maps a non-success response to `LlmError::Api`, pulling the provider's
    /// error message out of the body when it parses.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Provider API returned {}: {}", status, body);
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(LlmError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Returns the slice from the first `{` to the last `}`, tolerating prose or
/// markdown fences around the object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

/// Returns the slice from the first `[` to the last `]`.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end >= start).then(|| &text[start..=end])
}
