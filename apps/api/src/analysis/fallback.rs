//! Locally computed delivery analyses for the two no-LLM situations: the
//! provider was never configured, or the upstream pipeline failed
//! mid-request. Both return a full, well-formed response body.

use crate::analysis::fillers::filler_word_count;
use crate::analysis::korean::syllable_count;
use crate::analysis::speech_rate::{
    filler_advice, speech_rate, speed_advice, spm_for, AVG_SYLLABLES_PER_SEC,
};
use crate::models::feedback::{ContentFeedback, DeliveryAnalysis, DeliveryFeedback};

/// Content advice served when no LLM is configured.
pub const SAMPLE_CONTENT_ADVICE: &str =
    "전반적으로 좋은 답변입니다. 구체적인 예시를 더 추가하면 더욱 설득력있는 답변이 될 것입니다.";

/// Fixed advice strings for the degraded result after an upstream failure.
pub const DEGRADED_CONTENT_ADVICE: &str =
    "답변 내용이 질문과 관련이 있습니다. 더 구체적인 예시를 추가하면 좋겠습니다.";
pub const DEGRADED_SPEED_ADVICE: &str =
    "말하기 속도를 분석했습니다. 한국어 평균 속도(300-400 SPM)를 참고하여 조절해보세요.";
pub const DEGRADED_FILLER_ADVICE: &str = "필러 단어 사용을 줄이도록 노력해보세요.";

/// Full local analysis with banded advice. Used when no LLM is configured,
/// and by the in-process scoring client.
pub fn heuristic_analysis(transcript: &str, actual_duration_secs: Option<f64>) -> DeliveryAnalysis {
    let syllables = syllable_count(transcript);
    let spm = speech_rate(syllables, actual_duration_secs);
    let fillers = filler_word_count(transcript);

    DeliveryAnalysis {
        content_feedback: ContentFeedback {
            advice: SAMPLE_CONTENT_ADVICE.to_string(),
        },
        delivery_feedback: DeliveryFeedback {
            spm,
            speed_advice: speed_advice(spm),
            filler_count: fillers,
            filler_advice: filler_advice(fillers),
        },
    }
}

/// Best-effort result from the submitted transcript after the transcription
/// or chat call failed. Duration is estimated without the usual length gate
/// so the response always carries a rate figure.
pub fn degraded_analysis(transcript: &str) -> DeliveryAnalysis {
    let syllables = syllable_count(transcript);
    let estimated_secs = (syllables as f64 / AVG_SYLLABLES_PER_SEC).max(10.0);
    let spm = spm_for(syllables, estimated_secs);
    let fillers = filler_word_count(transcript);

    DeliveryAnalysis {
        content_feedback: ContentFeedback {
            advice: DEGRADED_CONTENT_ADVICE.to_string(),
        },
        delivery_feedback: DeliveryFeedback {
            spm: Some(spm),
            speed_advice: DEGRADED_SPEED_ADVICE.to_string(),
            filler_count: fillers,
            filler_advice: DEGRADED_FILLER_ADVICE.to_string(),
        },
    }
}
