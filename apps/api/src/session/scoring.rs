//! Scoring backends for the session controller.
//!
//! `HttpScoringClient` talks to a running scoring API; `LocalScoringClient`
//! answers in-process with the same heuristics that API serves when it has
//! no LLM configured. Offline rehearsal and the end-to-end tests use the
//! local one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;

use crate::analysis::fallback::heuristic_analysis;
use crate::evaluation::scoring::heuristic_evaluation;
use crate::models::feedback::{DeliveryAnalysis, Evaluation};
use crate::session::recorder::AudioBlob;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scoring service returned status {0}")]
    Status(u16),
}

/// Everything the delivery endpoint needs about one answer.
#[derive(Debug, Clone)]
pub struct AnswerSubmission {
    pub question: String,
    pub transcript: String,
    pub audio: AudioBlob,
    /// Recording time as measured by the session, in seconds.
    pub elapsed_secs: f64,
}

#[async_trait]
pub trait ScoringClient: Send + Sync {
    async fn evaluate_delivery(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<DeliveryAnalysis, ScoringError>;

    async fn evaluate_content(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, ScoringError>;
}

/// Scoring over HTTP against the interview API.
pub struct HttpScoringClient {
    client: Client,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ScoringClient for HttpScoringClient {
    async fn evaluate_delivery(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<DeliveryAnalysis, ScoringError> {
        let audio = Part::bytes(submission.audio.data.to_vec())
            .file_name("answer.wav")
            .mime_str(submission.audio.mime)?;
        let form = Form::new()
            .part("audio", audio)
            .text("question", submission.question.clone())
            .text("transcript", submission.transcript.clone())
            .text("actualDuration", submission.elapsed_secs.to_string());

        let url = format!("{}/api/interview/evaluate-delivery", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(ScoringError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn evaluate_content(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, ScoringError> {
        let url = format!("{}/api/interview/evaluate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "question": question, "userAnswer": answer }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ScoringError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

/// In-process scoring with the offline heuristics.
#[derive(Debug, Default, Clone)]
pub struct LocalScoringClient;

#[async_trait]
impl ScoringClient for LocalScoringClient {
    async fn evaluate_delivery(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<DeliveryAnalysis, ScoringError> {
        Ok(heuristic_analysis(
            &submission.transcript,
            Some(submission.elapsed_secs),
        ))
    }

    async fn evaluate_content(
        &self,
        _question: &str,
        answer: &str,
    ) -> Result<Evaluation, ScoringError> {
        Ok(heuristic_evaluation(answer))
    }
}
