// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relation records and the positional relation store.
//!
//! The store keeps records in index order: position `i` in the store is row
//! `i` of the similarity index built from it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One extracted cause-effect pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalPair {
    pub cause: String,
    pub effect: String,
}

impl CausalPair {
    pub fn new(cause: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            effect: effect.into(),
        }
    }
}

/// A sentence together with the relations extracted from it.
///
/// `text` and `relations` are required when deserializing; `source` defaults
/// to empty and `causal` to true. Other keys emitted by the extractor are
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    /// Source sentence
    pub text: String,
    /// Originating document identifier
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_causal")]
    pub causal: bool,
    pub relations: Vec<CausalPair>,
}

fn default_causal() -> bool {
    true
}

impl RelationRecord {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            causal: true,
            relations: Vec::new(),
        }
    }

    /// Adds a cause-effect pair
    pub fn with_relation(mut self, cause: impl Into<String>, effect: impl Into<String>) -> Self {
        self.relations.push(CausalPair::new(cause, effect));
        self
    }

    pub fn with_causal(mut self, causal: bool) -> Self {
        self.causal = causal;
        self
    }

    /// Text embedded for this record: the sentence followed by every pair,
    /// so retrieval rewards both topical and relation-specific overlap.
    pub fn index_text(&self) -> String {
        let mut text = String::with_capacity(self.text.len() + 32 * self.relations.len());
        text.push_str(&self.text);
        text.push(' ');
        for pair in &self.relations {
            text.push_str("Cause: ");
            text.push_str(&pair.cause);
            text.push_str(" Effect: ");
            text.push_str(&pair.effect);
            text.push(' ');
        }
        text
    }
}

/// Summary counts over the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Causal sentences held
    pub records: usize,
    /// Cause-effect pairs across all records
    pub relations: usize,
    /// Distinct source documents
    pub sources: usize,
}

/// Ordered, causal-only record sequence aligned with the similarity index
#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    records: Vec<RelationRecord>,
}

impl RelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from extractor output, keeping only causal records in
    /// their original order.
    pub fn from_records(records: impl IntoIterator<Item = RelationRecord>) -> Self {
        Self {
            records: records.into_iter().filter(|r| r.causal).collect(),
        }
    }

    pub fn get(&self, position: usize) -> Option<&RelationRecord> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RelationRecord] {
        &self.records
    }

    /// Composite texts to embed, one per record, in store order
    pub fn index_texts(&self) -> Vec<String> {
        self.records.iter().map(RelationRecord::index_text).collect()
    }

    /// All distinct causes, sorted
    pub fn all_causes(&self) -> Vec<String> {
        self.collect_sorted(|pair| &pair.cause)
    }

    /// All distinct effects, sorted
    pub fn all_effects(&self) -> Vec<String> {
        self.collect_sorted(|pair| &pair.effect)
    }

    pub fn stats(&self) -> StoreStats {
        let sources: HashSet<&str> = self.records.iter().map(|r| r.source.as_str()).collect();
        StoreStats {
            records: self.records.len(),
            relations: self.records.iter().map(|r| r.relations.len()).sum(),
            sources: sources.len(),
        }
    }

    fn collect_sorted<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&CausalPair) -> &String,
    {
        self.records
            .iter()
            .flat_map(|r| r.relations.iter())
            .map(field)
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }
}
