//! Prompt and model constants for question generation.

pub const QUESTION_MODEL: &str = "gpt-3.5-turbo";
pub const QUESTION_TEMPERATURE: f32 = 0.8;
pub const QUESTION_MAX_TOKENS: u32 = 1000;

pub const QUESTION_SYSTEM: &str =
    "You are a professional interviewer. Always respond with valid JSON only.";

/// Placeholders: `{keywords}` (job posting keywords as JSON), `{resume}`.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"You are an interviewer for a technical role. Based on the following information:

**Job Posting**: {keywords}

**Candidate's Resume**: {resume}

Generate 5 interview questions focused on their major and technical skills. For each question, specify a time limit.
- 3 questions should be long-answer (60 seconds)
- 2 questions should be short-answer (20 seconds)

Return a JSON array in this format:
[{"question": "질문 내용 (in Korean)", "time_limit": 60}, ...]

Provide ONLY the JSON array, no additional text. Questions should be in Korean."#;
