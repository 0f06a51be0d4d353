//! Filler-word detection tuned for Korean transcripts.
//!
//! `\b` word boundaries do not work for Hangul, so a token only counts when
//! the characters flanking it are whitespace, sentence punctuation, or the
//! transcript edge. Boundaries are tested without being consumed, so two
//! fillers separated by a single space both count.

/// Hesitation markers counted as a delivery-quality signal.
pub const FILLER_LEXICON: [&str; 9] = [
    "어",
    "음",
    "그",
    "저기",
    "이제",
    "뭐",
    "그러니까",
    "아",
    "네",
];

const BOUNDARY_PUNCTUATION: [char; 4] = [',', '.', '?', '!'];

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || BOUNDARY_PUNCTUATION.contains(&c),
    }
}

/// Counts occurrences of `word` in `text` flanked by boundaries on both
/// sides. Case-insensitive so non-Korean lexicon additions behave.
pub fn count_word_occurrences(text: &str, word: &str) -> u32 {
    if word.is_empty() {
        return 0;
    }
    let text = text.to_lowercase();
    let word = word.to_lowercase();

    let mut count = 0;
    for (start, matched) in text.match_indices(word.as_str()) {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        if is_boundary(before) && is_boundary(after) {
            count += 1;
        }
    }
    count
}

/// Total filler hits across the whole lexicon.
pub fn filler_word_count(transcript: &str) -> u32 {
    FILLER_LEXICON
        .iter()
        .map(|word| count_word_occurrences(transcript, word))
        .sum()
}
