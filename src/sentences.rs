// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentence supply for the extractor
//!
//! Turns raw document text into cleaned, length-filtered sentences.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:\-()]").expect("valid regex"));
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("valid regex"));

/// Length and quality bounds for sentences sent to the extractor
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceFilter {
    /// Minimum sentence length in characters
    pub min_chars: usize,
    /// Maximum sentence length in characters
    pub max_chars: usize,
    /// Minimum share of alphabetic characters
    pub min_alpha_ratio: f32,
}

impl Default for SentenceFilter {
    fn default() -> Self {
        Self {
            min_chars: 15,
            max_chars: 100,
            min_alpha_ratio: 0.5,
        }
    }
}

impl SentenceFilter {
    /// Whether an already-trimmed sentence passes the filter
    pub fn accepts(&self, sentence: &str) -> bool {
        let len = sentence.chars().count();
        if len < self.min_chars || len > self.max_chars || len == 0 {
            return false;
        }
        if !sentence.chars().any(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        let alpha = sentence.chars().filter(|c| c.is_alphabetic()).count();
        alpha as f32 / len as f32 >= self.min_alpha_ratio
    }
}

/// Collapses whitespace and removes characters other than word characters,
/// whitespace and basic punctuation
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    DISALLOWED.replace_all(&collapsed, "").trim().to_string()
}

/// Splits text into sentences at `.`, `!` or `?` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<String> {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let collapsed = collapsed.trim();

    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(collapsed) {
        let sentence = collapsed[start..boundary.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = boundary.end();
    }
    let tail = collapsed[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Keeps the trimmed sentences accepted by `filter`
pub fn filter_sentences<I, S>(sentences: I, filter: &SentenceFilter) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sentences
        .into_iter()
        .filter_map(|s| {
            let trimmed = s.as_ref().trim();
            filter.accepts(trimmed).then(|| trimmed.to_string())
        })
        .collect()
}

/// Cleans, splits and filters in one step
pub fn prepare_sentences(text: &str, filter: &SentenceFilter) -> Vec<String> {
    filter_sentences(split_sentences(&clean_text(text)), filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let text = "Smoking causes cancer.  Stress\nleads to insomnia! Does heat cause drought? Trailing";
        assert_eq!(
            split_sentences(text),
            vec![
                "Smoking causes cancer.",
                "Stress leads to insomnia!",
                "Does heat cause drought?",
                "Trailing",
            ]
        );
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_decimal_points_do_not_split() {
        assert_eq!(
            split_sentences("Rates rose 2.5 percent."),
            vec!["Rates rose 2.5 percent."]
        );
    }

    #[test]
    fn test_filter_bounds() {
        let filter = SentenceFilter::default();
        assert!(!filter.accepts("Too short."));
        assert!(filter.accepts("Smoking causes cancer."));
        assert!(!filter.accepts(&"a".repeat(101)));
        assert!(filter.accepts(&"a".repeat(100)));
        assert!(!filter.accepts("1234567890 12345 67890"));
        // alphabetic ratio below one half
        assert!(!filter.accepts("ab 1234567890123456"));
    }

    #[test]
    fn test_filter_sentences_trims() {
        let kept = filter_sentences(
            vec!["   Pollution increases asthma rates.  ", "short", "2024-01-01 12:00:00"],
            &SentenceFilter::default(),
        );
        assert_eq!(kept, vec!["Pollution increases asthma rates."]);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("  Heat   (mostly) causes\tdrought™ — often; 50%  "),
            "Heat (mostly) causes drought  often; 50"
        );
    }

    #[test]
    fn test_prepare_sentences() {
        let filter = SentenceFilter {
            min_chars: 5,
            max_chars: 40,
            min_alpha_ratio: 0.5,
        };
        let sentences = prepare_sentences("Heat causes drought. Ok. 42 42 42 42 42.", &filter);
        assert_eq!(sentences, vec!["Heat causes drought."]);
    }

    #[test]
    fn test_prepare_sentences_cleans_first() {
        let sentences = prepare_sentences(
            "Heat™  causes\n severe drought.  Rain → brings floods to valleys.",
            &SentenceFilter::default(),
        );
        assert_eq!(
            sentences,
            vec!["Heat causes severe drought.", "Rain brings floods to valleys."]
        );
    }
}
