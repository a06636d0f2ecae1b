//! Sentence splitting and extractive summaries

/// Non-empty sentences after splitting on runs of `.`, `!` and `?`
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep short texts intact; otherwise first sentence, ellipsis, last sentence
pub fn summarize(text: &str) -> String {
    let sentences = split_sentences(text);
    match sentences.as_slice() {
        [first, .., last] if sentences.len() > 2 => format!("{}... {}", first, last),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ignores_empty_runs() {
        let sentences = split_sentences("Wait!! Really?! Yes... ok");
        assert_eq!(sentences, vec!["Wait", "Really", "Yes", "ok"]);
    }

    #[test]
    fn test_short_text_is_identity() {
        let text = "First sentence. Second sentence.";
        assert_eq!(summarize(text), text);
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn test_long_text_keeps_first_and_last() {
        let text = "First sentence. Second sentence. Third sentence.";
        let summary = summarize(text);
        assert_eq!(summary, "First sentence... Third sentence");
        assert!(!summary.contains("Second"));
    }
}
