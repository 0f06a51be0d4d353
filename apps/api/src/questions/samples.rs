//! The built-in question set served when no LLM is configured. Also the
//! default set for offline rehearsal sessions.

use crate::models::question::Question;

/// Fixed five-question set: three long-form (60 s), then two short-form (20 s).
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new("본인의 강점과 약점을 말씀해주세요.", 60),
        Question::new("이 직무에 지원하게 된 동기는 무엇인가요?", 60),
        Question::new("팀 프로젝트에서 갈등이 발생했을 때 어떻게 해결하셨나요?", 60),
        Question::new("가장 자신있는 기술 스택은 무엇인가요?", 20),
        Question::new("5년 후 본인의 모습을 그려보신다면?", 20),
    ]
}
