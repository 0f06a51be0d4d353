use serde::{Deserialize, Serialize};

/// Qualitative feedback on the substance of an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFeedback {
    pub advice: String,
}

/// Measured delivery metrics plus coaching advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFeedback {
    /// Syllables per minute; `None` when the answer was too short to measure.
    pub spm: Option<u32>,
    pub speed_advice: String,
    pub filler_count: u32,
    pub filler_advice: String,
}

/// Response body of `POST /api/interview/evaluate-delivery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAnalysis {
    pub content_feedback: ContentFeedback,
    pub delivery_feedback: DeliveryFeedback,
}

/// Response body of `POST /api/interview/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0 to 10.
    pub score: u8,
    pub feedback: String,
}
