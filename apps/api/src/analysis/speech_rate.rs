//! Speech-rate math and the advice bands used by the local fallback paths.
//!
//! Korean delivery is measured in syllables per minute (SPM); the comfortable
//! interview range is 300-400 SPM.

/// Recordings shorter than this are not trusted as a rate denominator.
const MIN_RELIABLE_DURATION_SECS: f64 = 5.0;
/// Minimum syllables before an untimed answer gets an estimated duration.
const MIN_SYLLABLES_FOR_ESTIMATE: u32 = 20;
/// Average Korean speaking rate used for duration estimates.
pub(crate) const AVG_SYLLABLES_PER_SEC: f64 = 5.8;

pub const TOO_SHORT_SPEED_ADVICE: &str =
    "답변이 너무 짧아 말 속도를 정확히 측정할 수 없습니다. 좀 더 길게 답변해보세요.";

/// Syllables-per-minute for a known duration.
pub(crate) fn spm_for(syllables: u32, duration_secs: f64) -> u32 {
    ((syllables as f64 / duration_secs) * 60.0).round() as u32
}

/// Computes SPM, degrading through the three policy tiers: a measured
/// duration of at least five seconds is used directly; a long-enough
/// transcript gets an estimated duration (never below ten seconds); anything
/// shorter is not rated.
pub fn speech_rate(syllables: u32, actual_duration_secs: Option<f64>) -> Option<u32> {
    if let Some(secs) = actual_duration_secs {
        if secs >= MIN_RELIABLE_DURATION_SECS {
            return Some(spm_for(syllables, secs));
        }
    }
    if syllables >= MIN_SYLLABLES_FOR_ESTIMATE {
        let estimated_secs = (syllables as f64 / AVG_SYLLABLES_PER_SEC).round().max(10.0);
        return Some(spm_for(syllables, estimated_secs));
    }
    None
}

/// Maps an SPM reading to coaching advice. A zero reading means the
/// transcript was effectively empty and is treated as unmeasurable.
pub fn speed_advice(spm: Option<u32>) -> String {
    let advice = match spm {
        None | Some(0) => TOO_SHORT_SPEED_ADVICE,
        Some(spm) if (300..=400).contains(&spm) => {
            "말의 속도가 적절합니다. 듣기 편안한 속도로 답변하셨습니다."
        }
        Some(spm) if spm < 250 => {
            "말의 속도가 상당히 느립니다. 좀 더 자신감 있고 활기차게 말씀해보세요."
        }
        Some(spm) if spm < 300 => {
            "말의 속도가 다소 느립니다. 조금 더 자신감 있게 말씀하시면 좋겠습니다."
        }
        Some(spm) if spm > 450 => {
            "말의 속도가 상당히 빠릅니다. 면접관이 내용을 따라가기 어려울 수 있으니 천천히 말해보세요."
        }
        Some(_) => "말의 속도가 다소 빠릅니다. 조금 더 천천히 말하면 면접관이 이해하기 쉬울 것입니다.",
    };
    advice.to_string()
}

/// Maps a filler count to coaching advice.
pub fn filler_advice(count: u32) -> String {
    if count <= 2 {
        "불필요한 필러 단어 사용이 적어 매우 좋습니다.".to_string()
    } else if count <= 5 {
        format!("'어', '음' 같은 필러 단어가 {count}회 사용되었습니다. 조금 줄이면 더욱 전문적으로 들립니다.")
    } else {
        format!("필러 단어가 {count}회 사용되어 다소 많습니다. 답변 전에 잠시 생각하는 시간을 가지면 줄일 수 있습니다.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_duration_used_directly() {
        // 33 syllables over 6 seconds = 330 SPM
        assert_eq!(speech_rate(33, Some(6.0)), Some(330));
    }

    #[test]
    fn test_short_duration_falls_through_to_estimate() {
        // 4s recording is not reliable; 29 syllables / 5.8 = 5s, floored to 10s
        assert_eq!(speech_rate(29, Some(4.0)), Some(174));
    }

    #[test]
    fn test_estimate_floor_is_ten_seconds() {
        // 20 syllables estimate to 3s, floored to 10s = 120 SPM
        assert_eq!(speech_rate(20, None), Some(120));
    }

    #[test]
    fn test_long_transcript_estimates_average_rate() {
        // 58 syllables / 5.8 = 10s, so the estimate lands on the average rate
        assert_eq!(speech_rate(58, None), Some(348));
    }

    #[test]
    fn test_too_short_is_not_rated() {
        assert_eq!(speech_rate(19, None), None);
        assert_eq!(speech_rate(11, Some(3.0)), None);
    }

    #[test]
    fn test_speed_advice_band_edges() {
        assert!(speed_advice(Some(300)).contains("적절"));
        assert!(speed_advice(Some(400)).contains("적절"));
        assert!(speed_advice(Some(249)).contains("상당히 느립니다"));
        assert!(speed_advice(Some(250)).contains("다소 느립니다"));
        assert!(speed_advice(Some(450)).contains("다소 빠릅니다"));
        assert!(speed_advice(Some(451)).contains("상당히 빠릅니다"));
    }

    #[test]
    fn test_unmeasured_and_zero_spm_share_advice() {
        assert_eq!(speed_advice(None), TOO_SHORT_SPEED_ADVICE);
        assert_eq!(speed_advice(Some(0)), TOO_SHORT_SPEED_ADVICE);
    }

    #[test]
    fn test_filler_advice_bands() {
        assert!(filler_advice(0).contains("매우 좋습니다"));
        assert!(filler_advice(2).contains("매우 좋습니다"));
        assert!(filler_advice(3).contains("3회"));
        assert!(filler_advice(5).contains("5회"));
        assert!(filler_advice(6).contains("다소 많습니다"));
    }
}
