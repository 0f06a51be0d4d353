//! Axum route handler for the Delivery Metrics API.
//!
//! Fallback discipline: a missing LLM key answers from local heuristics, an
//! upstream failure answers with a degraded local result, and only malformed
//! requests or genuine bugs surface as error statuses.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::analysis::fallback::{degraded_analysis, heuristic_analysis};
use crate::analysis::fillers::filler_word_count;
use crate::analysis::korean::syllable_count;
use crate::analysis::prompts::{
    DELIVERY_MAX_TOKENS, DELIVERY_MODEL, DELIVERY_PROMPT_TEMPLATE, DELIVERY_SYSTEM,
    DELIVERY_TEMPERATURE,
};
use crate::analysis::speech_rate::spm_for;
use crate::errors::AppError;
use crate::llm_client::{ChatOptions, LlmClient, LlmError};
use crate::models::feedback::DeliveryAnalysis;
use crate::state::AppState;

/// One parsed evaluate-delivery submission.
struct DeliverySubmission {
    audio: Bytes,
    audio_file_name: String,
    audio_mime: String,
    question: String,
    transcript: String,
    actual_duration_secs: Option<f64>,
}

/// POST /api/interview/evaluate-delivery
///
/// Multipart fields: `audio` (file), `question`, `transcript`, and optional
/// `actualDuration` in seconds.
pub async fn handle_evaluate_delivery(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DeliveryAnalysis>, AppError> {
    let submission = read_submission(multipart).await?;

    let Some(llm) = &state.llm else {
        debug!("LLM_API_KEY not set; returning heuristic delivery analysis");
        return Ok(Json(heuristic_analysis(
            &submission.transcript,
            submission.actual_duration_secs,
        )));
    };

    match analyze_with_llm(llm, &state.config.speech_language, &submission).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            warn!("Delivery pipeline failed, serving degraded local analysis: {e}");
            Ok(Json(degraded_analysis(&submission.transcript)))
        }
    }
}

/// Collects and validates the multipart fields. Unknown fields are drained
/// and ignored.
async fn read_submission(mut multipart: Multipart) -> Result<DeliverySubmission, AppError> {
    let mut audio: Option<Bytes> = None;
    let mut audio_file_name = String::from("answer.wav");
    let mut audio_mime = String::from("audio/wav");
    let mut question: Option<String> = None;
    let mut transcript: Option<String> = None;
    let mut actual_duration_secs: Option<f64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                if let Some(file_name) = field.file_name() {
                    audio_file_name = file_name.to_string();
                }
                if let Some(mime) = field.content_type() {
                    audio_mime = mime.to_string();
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable audio field: {e}")))?;
                audio = Some(data);
            }
            "question" => {
                question = Some(read_text_field(field).await?);
            }
            "transcript" => {
                transcript = Some(read_text_field(field).await?);
            }
            "actualDuration" => {
                actual_duration_secs = read_text_field(field).await?.trim().parse::<f64>().ok();
            }
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| AppError::Validation("audio file is required".to_string()))?;
    let question = question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation("question is required".to_string()))?;
    let transcript =
        transcript.ok_or_else(|| AppError::Validation("transcript is required".to_string()))?;

    Ok(DeliverySubmission {
        audio,
        audio_file_name,
        audio_mime,
        question,
        transcript,
        actual_duration_secs,
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("unreadable text field: {e}")))
}

/// The full upstream pipeline: transcribe, measure, coach. Any error here
/// sends the caller down the degraded local path.
async fn analyze_with_llm(
    llm: &LlmClient,
    language: &str,
    submission: &DeliverySubmission,
) -> Result<DeliveryAnalysis, LlmError> {
    let transcription = llm
        .transcribe(
            submission.audio.clone(),
            &submission.audio_file_name,
            &submission.audio_mime,
            language,
        )
        .await?;

    // Prefer the provider transcript; the browser-side one is the backup
    let transcript = if transcription.text.trim().is_empty() {
        submission.transcript.clone()
    } else {
        transcription.text
    };

    let duration_secs = match submission.actual_duration_secs {
        Some(d) if d >= 5.0 => d,
        _ => transcription.duration.unwrap_or(30.0),
    };

    let syllables = syllable_count(&transcript);
    let spm = spm_for(syllables, duration_secs);
    let fillers = filler_word_count(&transcript);
    info!(
        "Measured delivery: {syllables} syllables / {duration_secs:.1}s = {spm} SPM, {fillers} fillers"
    );

    let prompt = DELIVERY_PROMPT_TEMPLATE
        .replace("{question}", &submission.question)
        .replace("{transcript}", &transcript)
        .replace("{spm}", &spm.to_string())
        .replace("{filler_count}", &fillers.to_string());

    llm.call_json::<DeliveryAnalysis>(
        &prompt,
        DELIVERY_SYSTEM,
        ChatOptions {
            model: DELIVERY_MODEL,
            temperature: DELIVERY_TEMPERATURE,
            max_tokens: DELIVERY_MAX_TOKENS,
            json_object: true,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::analysis::fallback::SAMPLE_CONTENT_ADVICE;
    use crate::config::Config;
    use crate::models::feedback::DeliveryAnalysis;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "rostrum-test-boundary";

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

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .into_bytes()
    }

    fn audio_part(bytes: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"answer.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(bytes);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn delivery_request(parts: Vec<Vec<u8>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(&part);
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/interview/evaluate-delivery")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_audio_is_rejected() {
        let app = build_router(make_state());
        let request = delivery_request(vec![
            text_part("question", "자기소개를 해주세요."),
            text_part("transcript", "저는 개발자입니다"),
        ]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_transcript_is_rejected() {
        let app = build_router(make_state());
        let request = delivery_request(vec![
            audio_part(&[0u8; 64]),
            text_part("question", "자기소개를 해주세요."),
        ]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_heuristic_analysis_without_llm() {
        let app = build_router(make_state());
        let request = delivery_request(vec![
            audio_part(&[0u8; 64]),
            text_part("question", "자기소개를 해주세요."),
            text_part("transcript", "저는 백엔드 개발자입니다"),
            text_part("actualDuration", "5"),
        ]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let analysis: DeliveryAnalysis = serde_json::from_slice(&body).unwrap();
        assert_eq!(analysis.delivery_feedback.spm, Some(132));
        assert_eq!(analysis.delivery_feedback.filler_count, 0);
        assert_eq!(analysis.content_feedback.advice, SAMPLE_CONTENT_ADVICE);
    }

    #[tokio::test]
    async fn test_unrated_speed_for_untimed_short_answer() {
        let app = build_router(make_state());
        let request = delivery_request(vec![
            audio_part(&[0u8; 64]),
            text_part("question", "자기소개를 해주세요."),
            text_part("transcript", "저는 백엔드 개발자입니다"),
        ]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let analysis: DeliveryAnalysis = serde_json::from_slice(&body).unwrap();
        assert_eq!(analysis.delivery_feedback.spm, None);
    }
}
