//! Hangul syllable counting, the unit behind every speech-rate figure.

/// Counts the Hangul characters in `text`: precomposed syllables plus
/// conjoining and compatibility jamo. Latin letters, digits, whitespace,
/// and punctuation are ignored.
pub fn syllable_count(text: &str) -> u32 {
    text.chars().filter(|c| is_hangul(*c)).count() as u32
}

fn is_hangul(c: char) -> bool {
    matches!(
        c,
        '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_precomposed_syllables() {
        assert_eq!(syllable_count("저는 백엔드 개발자입니다"), 11);
    }

    #[test]
    fn test_ignores_latin_digits_punctuation() {
        assert_eq!(syllable_count("Rust 개발 3년차입니다!"), 7);
    }

    #[test]
    fn test_counts_compatibility_jamo() {
        // Recognition engines sometimes emit bare jamo for trailing sounds
        assert_eq!(syllable_count("ㅇㅋ 알겠습니다"), 7);
    }

    #[test]
    fn test_empty_and_non_korean() {
        assert_eq!(syllable_count(""), 0);
        assert_eq!(syllable_count("hello world 123"), 0);
    }
}
