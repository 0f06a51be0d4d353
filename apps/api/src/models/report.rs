use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::feedback::DeliveryFeedback;

/// The immutable record of one resolved question. Appended exactly once per
/// question, whether it was answered, skipped, or timed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub question: String,
    pub answer_text: String,
    pub content_feedback: String,
    /// Absent when scoring fell back to content-only evaluation or the
    /// question was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_metrics: Option<DeliveryFeedback>,
}

/// Everything a finished rehearsal hands back to its caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<AnswerResult>,
}
