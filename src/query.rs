// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries and scored results.

use serde::{Deserialize, Serialize};

use crate::errors::{SearchError, SearchResult};
use crate::store::{CausalPair, RelationRecord};

/// Number of results returned when none is requested
pub const DEFAULT_TOP_K: usize = 5;

/// Minimum similarity used by the convenience lookups
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.25;

/// Words dropped from natural-language questions before searching
const QUESTION_WORDS: &[&str] = &[
    "what", "are", "the", "of", "is", "does", "cause", "effect", "causes", "effects", "?",
];

/// Which role of a relation the query should match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Query names a cause; return its effects
    FindEffects,
    /// Query names an effect; return its causes
    FindCauses,
    /// Plain semantic search, relations unfiltered
    #[default]
    General,
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::FindEffects => write!(f, "find effects"),
            QueryMode::FindCauses => write!(f, "find causes"),
            QueryMode::General => write!(f, "general search"),
        }
    }
}

impl std::str::FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "find effects" | "effects" | "e" => Ok(QueryMode::FindEffects),
            "find causes" | "causes" | "c" => Ok(QueryMode::FindCauses),
            "general search" | "general" | "g" => Ok(QueryMode::General),
            _ => Err(format!("Unknown query mode: {}", s)),
        }
    }
}

/// A typed search request
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub raw_text: String,
    pub mode: QueryMode,
    pub top_k: usize,
    pub similarity_threshold: f32,
}

impl Query {
    /// Creates a query with the default `top_k` and threshold
    pub fn new(raw_text: impl Into<String>, mode: QueryMode) -> Self {
        Self {
            raw_text: raw_text.into(),
            mode,
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_threshold(mut self, similarity_threshold: f32) -> Self {
        self.similarity_threshold = similarity_threshold;
        self
    }

    /// Checks parameters; called before any embedding work
    pub fn validate(&self) -> SearchResult<()> {
        if self.top_k == 0 {
            return Err(SearchError::invalid_query("top_k must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(SearchError::invalid_query(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.raw_text.trim().is_empty() {
            return Err(SearchError::invalid_query("query text is empty"));
        }
        Ok(())
    }

    /// Trimmed, lowercased query text
    pub fn normalized_text(&self) -> String {
        self.raw_text.trim().to_lowercase()
    }
}

/// A matched record with its similarity score.
///
/// For role queries `relations` holds only the pairs that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub text: String,
    pub source: String,
    pub causal: bool,
    pub relations: Vec<CausalPair>,
    pub score: f32,
}

impl ScoredResult {
    pub fn new(record: &RelationRecord, relations: Vec<CausalPair>, score: f32) -> Self {
        Self {
            text: record.text.clone(),
            source: record.source.clone(),
            causal: record.causal,
            relations,
            score,
        }
    }
}

/// Drops question words so "What are the effects of smoking?" searches for
/// "smoking". Returns the original text when nothing would remain.
pub fn strip_question_words(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    let terms: Vec<&str> = lowered
        .split_whitespace()
        .filter(|word| !QUESTION_WORDS.contains(word))
        .collect();

    if terms.is_empty() {
        query.to_string()
    } else {
        terms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_mode_parsing() {
        assert_eq!(
            "find effects".parse::<QueryMode>().unwrap(),
            QueryMode::FindEffects
        );
        assert_eq!(
            "find_causes".parse::<QueryMode>().unwrap(),
            QueryMode::FindCauses
        );
        assert_eq!(
            "Find-Effects".parse::<QueryMode>().unwrap(),
            QueryMode::FindEffects
        );
        assert_eq!(
            "general search".parse::<QueryMode>().unwrap(),
            QueryMode::General
        );
        assert!("sideways".parse::<QueryMode>().is_err());
        assert_eq!(QueryMode::FindCauses.to_string(), "find causes");
    }

    #[test]
    fn test_validate() {
        let base = Query::new("smoking", QueryMode::General);
        assert!(base.validate().is_ok());
        assert!(base.clone().with_threshold(0.0).validate().is_ok());
        assert!(base.clone().with_threshold(1.0).validate().is_ok());

        for bad in [
            base.clone().with_top_k(0),
            base.clone().with_threshold(1.01),
            base.clone().with_threshold(-0.1),
            base.clone().with_threshold(f32::NAN),
            Query::new("   ", QueryMode::FindEffects),
        ] {
            assert!(matches!(
                bad.validate(),
                Err(SearchError::InvalidQuery { .. })
            ));
        }
    }

    #[test]
    fn test_normalized_text() {
        let query = Query::new("  Air POLLUTION ", QueryMode::FindEffects);
        assert_eq!(query.normalized_text(), "air pollution");
    }

    #[test]
    fn test_strip_question_words() {
        assert_eq!(
            strip_question_words("What are the effects of smoking"),
            "smoking"
        );
        assert_eq!(
            strip_question_words("What causes climate change ?"),
            "climate change"
        );
        assert_eq!(strip_question_words("What causes"), "What causes");
    }

    #[test]
    fn test_scored_result_serializes_flat() {
        let record = RelationRecord::new("Heat causes drought.", "c.pdf");
        let result = ScoredResult::new(&record, vec![CausalPair::new("Heat", "drought")], 0.75);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["text"], "Heat causes drought.");
        assert_eq!(json["relations"][0]["cause"], "Heat");
        assert_eq!(json["score"], 0.75);
    }
}
