//! Prompt and model constants for the content evaluation endpoint.

pub const EVALUATION_MODEL: &str = "gpt-4o";
pub const EVALUATION_TEMPERATURE: f32 = 0.7;
pub const EVALUATION_MAX_TOKENS: u32 = 500;

/// Korean output is pinned in the system message so the user prompt can stay
/// focused on the rubric.
pub const EVALUATION_SYSTEM: &str =
    "You are a professional technical interviewer. Always respond with valid JSON only in Korean.";

/// Placeholders: `{question}`, `{answer}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"As a technical interviewer, evaluate the following answer in Korean.

**Question**: {question}

**Candidate's Answer**: {answer}

Provide feedback on clarity, technical accuracy, relevance, and answer structure (STAR: Situation-Task-Action-Result). Give a score from 1-10 and provide a concise feedback point in Korean.

Return a JSON object in this format:
{"score": 8, "feedback": "피드백 내용 in Korean"}

Provide ONLY the JSON object, no additional text."#;
