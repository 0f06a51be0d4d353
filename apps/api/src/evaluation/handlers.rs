//! Axum route handler for the Content Evaluation API.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::evaluation::prompts::{
    EVALUATION_MAX_TOKENS, EVALUATION_MODEL, EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM,
    EVALUATION_TEMPERATURE,
};
use crate::evaluation::scoring::heuristic_evaluation;
use crate::llm_client::ChatOptions;
use crate::models::feedback::Evaluation;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
}

/// POST /api/interview/evaluate
///
/// Scores one answer against one question. Unlike the delivery endpoint,
/// an upstream failure here surfaces as a 500: the rehearsal client carries
/// its own terminal fallback, so silent degradation would hide real outages.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<Evaluation>, AppError> {
    if request.question.is_empty() || request.user_answer.is_empty() {
        return Err(AppError::Validation(
            "question and userAnswer are required".to_string(),
        ));
    }

    let Some(llm) = &state.llm else {
        debug!("LLM_API_KEY not set; returning heuristic evaluation");
        return Ok(Json(heuristic_evaluation(&request.user_answer)));
    };

    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", &request.question)
        .replace("{answer}", &request.user_answer);

    let mut evaluation: Evaluation = llm
        .call_json(
            &prompt,
            EVALUATION_SYSTEM,
            ChatOptions {
                model: EVALUATION_MODEL,
                temperature: EVALUATION_TEMPERATURE,
                max_tokens: EVALUATION_MAX_TOKENS,
                json_object: false,
            },
        )
        .await
        .map_err(|e| AppError::Llm(format!("Content evaluation failed: {e}")))?;

    evaluation.score = evaluation.score.min(10);
    Ok(Json(evaluation))
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::Json;

    use super::*;
    use crate::config::Config;
    use crate::evaluation::scoring::NO_ANSWER_FEEDBACK;

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

    fn make_request(question: &str, answer: &str) -> EvaluationRequest {
        EvaluationRequest {
            question: question.to_string(),
            user_answer: answer.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_answer_is_rejected() {
        let result = handle_evaluate(
            State(make_state()),
            Json(make_request("자기소개를 해주세요.", "")),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_skipped_placeholder_scores_zero() {
        let Json(evaluation) = handle_evaluate(
            State(make_state()),
            Json(make_request("자기소개를 해주세요.", "건너뜀")),
        )
        .await
        .unwrap();
        assert_eq!(evaluation.score, 0);
        assert_eq!(evaluation.feedback, NO_ANSWER_FEEDBACK);
    }

    #[tokio::test]
    async fn test_long_answer_scores_higher() {
        let Json(short) = handle_evaluate(
            State(make_state()),
            Json(make_request("자기소개를 해주세요.", "저는 개발자입니다.")),
        )
        .await
        .unwrap();
        let Json(long) = handle_evaluate(
            State(make_state()),
            Json(make_request("자기소개를 해주세요.", &"가".repeat(250))),
        )
        .await
        .unwrap();
        assert_eq!(short.score, 5);
        assert_eq!(long.score, 8);
    }
}
