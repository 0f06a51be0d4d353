use serde::{Deserialize, Serialize};

/// One interview question with its answer time budget.
/// Wire names (`question`, `time_limit`) match the question-generation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "time_limit")]
    pub time_limit_secs: u32,
}

impl Question {
    pub fn new(text: impl Into<String>, time_limit_secs: u32) -> Self {
        Self {
            text: text.into(),
            time_limit_secs,
        }
    }
}

/// Response body of `POST /api/interview/generate-questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}
