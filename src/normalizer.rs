/// Tokenize raw review text into lowercase terms, dropping stop words and
/// very short tokens.
///
/// Splitting is naive whitespace splitting: punctuation attached to a word
/// stays attached, so "food." and "food" count as distinct terms.
pub fn normalize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .filter(|word| !is_stop_word(word) && word.chars().count() > 2)
        .collect()
}

/// Check if a word is in the fixed stop-word list applied when counting terms.
pub fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "a" | "to" | "is" | "in" | "that" | "it" | "with" | "for" | "as" |
        "was" | "on" | "are" | "this" | "be" | "at" | "by" | "i" | "you" | "of"
    )
}
