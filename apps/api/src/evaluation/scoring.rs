//! Deterministic content scoring used when no LLM is configured.
//!
//! The placeholder strings double as wire values: the session controller
//! submits them verbatim when an answer is empty or skipped, and the scorer
//! recognizes them on the way back in.

use crate::models::feedback::Evaluation;

/// Answer text submitted when recording produced no transcript.
pub const NO_ANSWER_PLACEHOLDER: &str = "답변 없음";

/// Answer text recorded when the user skips a question.
pub const SKIPPED_PLACEHOLDER: &str = "건너뜀";

/// Feedback attached to placeholder answers.
pub const NO_ANSWER_FEEDBACK: &str = "답변이 제공되지 않았습니다.";

/// Feedback attached to length-scored answers.
pub const LENGTH_HEURISTIC_FEEDBACK: &str =
    "전반적으로 좋은 답변입니다. 구체적인 사례를 더 추가하면 더욱 설득력있는 답변이 될 것 같습니다.";

/// Scores an answer without an LLM: placeholders get zero, everything else
/// is banded by character count.
pub fn heuristic_evaluation(answer: &str) -> Evaluation {
    if answer == NO_ANSWER_PLACEHOLDER || answer == SKIPPED_PLACEHOLDER {
        return Evaluation {
            score: 0,
            feedback: NO_ANSWER_FEEDBACK.to_string(),
        };
    }

    let length = answer.chars().count();
    let score = if length > 200 {
        8
    } else if length > 100 {
        7
    } else {
        5
    };

    Evaluation {
        score,
        feedback: LENGTH_HEURISTIC_FEEDBACK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_answers_score_zero() {
        for placeholder in [NO_ANSWER_PLACEHOLDER, SKIPPED_PLACEHOLDER] {
            let evaluation = heuristic_evaluation(placeholder);
            assert_eq!(evaluation.score, 0);
            assert_eq!(evaluation.feedback, NO_ANSWER_FEEDBACK);
        }
    }

    #[test]
    fn test_score_bands_by_character_count() {
        assert_eq!(heuristic_evaluation("네 알겠습니다").score, 5);
        assert_eq!(heuristic_evaluation(&"가".repeat(100)).score, 5);
        assert_eq!(heuristic_evaluation(&"가".repeat(101)).score, 7);
        assert_eq!(heuristic_evaluation(&"가".repeat(200)).score, 7);
        assert_eq!(heuristic_evaluation(&"가".repeat(201)).score, 8);
    }

    #[test]
    fn test_real_answer_gets_encouragement_feedback() {
        let evaluation = heuristic_evaluation("저는 3년차 백엔드 개발자입니다.");
        assert_eq!(evaluation.feedback, LENGTH_HEURISTIC_FEEDBACK);
    }
}
