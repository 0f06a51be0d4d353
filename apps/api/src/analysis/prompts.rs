// LLM prompt constants for the delivery analysis module.

/// Model and sampling parameters for delivery coaching.
pub const DELIVERY_MODEL: &str = "gpt-4o";
pub const DELIVERY_TEMPERATURE: f32 = 0.7;
pub const DELIVERY_MAX_TOKENS: u32 = 1000;

/// System prompt — Korean output, JSON only.
pub const DELIVERY_SYSTEM: &str =
    "You are a professional interview coach. Always respond with valid JSON only in Korean.";

/// Delivery coaching prompt template.
/// Replace `{question}`, `{transcript}`, `{spm}`, `{filler_count}` before sending.
/// The spm and filler figures are measured locally; the model must echo them
/// unchanged in its response.
pub const DELIVERY_PROMPT_TEMPLATE: &str = r#"당신은 10년 이상 임원 스피치 코칭과 면접 트레이닝을 담당해온 커뮤니케이션 전문가입니다. 답변의 내용과 전달 방식을 모두 고려하여 심층 분석해주세요.

## 분석 자료

**면접 질문**: "{question}"

**답변 전사본**: "{transcript}"

**측정된 전달력 지표** (한국어 기준):
- 말 속도: {spm} SPM (음절/분)
  * 이상적 범위: 300-400 SPM
  * 너무 빠름(>450): 조급해 보이거나 긴장한 인상
  * 다소 빠름(400-450) / 다소 느림(250-300): 수용 가능
  * 너무 느림(<250): 준비 부족이나 자신감 결여로 보일 수 있음
- 필러 단어 사용: {filler_count}회
  * 우수(0-2회), 양호(3-5회), 개선 필요(6회 이상)

## 평가 기준

**답변 내용**: STAR 구조(Situation-Task-Action-Result) 적용 여부, 구체적 사례와 정량적 지표, 질문과의 관련성, 논리적 흐름, 비즈니스 임팩트.

**전달력**: 측정된 말 속도와 필러 단어 사용이 면접관에게 주는 인상, 핵심 메시지의 명료성, 표현의 확신성.

## 피드백 작성 가이드

- contentFeedback.advice: 3-4문단, 최소 250자. 강점 인정 후 가장 중요한 개선점 1-2개와 구체적인 개선 예시, 마지막으로 실전 적용 팁.
- speedAdvice: 2-3문장, 최소 80자. 측정된 {spm} SPM에 대한 평가와 이상적 범위(300-400 SPM) 대비 구체적 개선 방법.
- fillerAdvice: 2-3문장, 최소 80자. {filler_count}회 사용이 주는 인상과 실전 개선 팁(답변 전 3초 생각, 짧은 침묵 활용 등).

모든 피드백은 즉시 실행 가능한 조언으로, 긍정적 부분을 인정한 뒤 개선 방향을 제시하세요.

## 출력 형식

다음 JSON 형식으로만 응답하세요:

{
  "contentFeedback": {
    "advice": "3-4문단으로 구성된 상세한 내용 피드백 (250자 이상)"
  },
  "deliveryFeedback": {
    "spm": {spm},
    "speedAdvice": "말 속도에 대한 구체적이고 실행 가능한 조언 (80자 이상)",
    "fillerCount": {filler_count},
    "fillerAdvice": "필러 단어 개선을 위한 구체적인 실전 팁 (80자 이상)"
  }
}"#;
