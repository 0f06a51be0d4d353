//! Axum route handler for the Question Generation API.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::ChatOptions;
use crate::models::question::{Question, QuestionSet};
use crate::questions::prompts::{
    QUESTION_MAX_TOKENS, QUESTION_MODEL, QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM,
    QUESTION_TEMPERATURE,
};
use crate::questions::samples::sample_questions;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    /// Keywords from the job posting. Any JSON shape is accepted (the
    /// posting parser sends either a string or an array of strings).
    #[serde(default)]
    pub job_keywords: Value,
    #[serde(default)]
    pub resume_text: String,
}

/// POST /api/interview/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionSet>, AppError> {
    let keywords_missing = match &request.job_keywords {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if keywords_missing || request.resume_text.is_empty() {
        return Err(AppError::Validation(
            "jobKeywords and resumeText are required".to_string(),
        ));
    }

    let Some(llm) = &state.llm else {
        debug!("LLM_API_KEY not set; returning the sample question set");
        return Ok(Json(QuestionSet {
            questions: sample_questions(),
        }));
    };

    let prompt = QUESTION_PROMPT_TEMPLATE
        .replace("{keywords}", &request.job_keywords.to_string())
        .replace("{resume}", &request.resume_text);

    let mut questions: Vec<Question> = llm
        .call_json_array(
            &prompt,
            QUESTION_SYSTEM,
            ChatOptions {
                model: QUESTION_MODEL,
                temperature: QUESTION_TEMPERATURE,
                max_tokens: QUESTION_MAX_TOKENS,
                json_object: false,
            },
        )
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    if questions.len() < 5 {
        warn!(
            "Question generation returned {} questions, expected 5",
            questions.len()
        );
        return Err(AppError::Llm(
            "Question generation returned an incomplete set".to_string(),
        ));
    }
    questions.truncate(5);

    Ok(Json(QuestionSet { questions }))
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::Json;
    use serde_json::json;

    use super::*;
    use crate::config::Config;

    fn make_state() -> AppState {
        AppState {
            config: Config {
                llm_api_key: None,
                llm_api_url: "https://api.openai.com/v1".to_string(),
                speech_language: "ko".to_string(),
                port: 8080,
                rust_log: "info".to_string(),
            },
            llm: None,
        }
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected() {
        let request = QuestionRequest {
            job_keywords: json!(["Rust", "백엔드"]),
            resume_text: String::new(),
        };
        let result = handle_generate_questions(State(make_state()), Json(request)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_null_keywords_are_rejected() {
        let request = QuestionRequest {
            job_keywords: Value::Null,
            resume_text: "3년차 백엔드 개발자입니다.".to_string(),
        };
        let result = handle_generate_questions(State(make_state()), Json(request)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sample_set_without_llm() {
        let request = QuestionRequest {
            job_keywords: json!(["Rust", "백엔드"]),
            resume_text: "3년차 백엔드 개발자입니다.".to_string(),
        };
        let Json(set) = handle_generate_questions(State(make_state()), Json(request))
            .await
            .unwrap();
        assert_eq!(set.questions.len(), 5);
        assert_eq!(set.questions[0].text, "본인의 강점과 약점을 말씀해주세요.");
        assert_eq!(set.questions[3].time_limit_secs, 20);
    }
}
