// SPDX-License-Identifier: MIT OR Apache-2.0

//! Causal search engine - owns the embedder, relation store and similarity
//! index, and answers typed queries over them.
//!
//! Lifecycle: [`CausalSearchEngine::new`], then [`CausalSearchEngine::build_index`]
//! once per extraction batch, then any number of searches until the next
//! build replaces everything.

use std::cmp::Ordering;
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::errors::{SearchError, SearchResult};
use crate::index::{cosine_similarity, SimilarityIndex};
use crate::query::{Query, QueryMode, ScoredResult, DEFAULT_SIMILARITY_THRESHOLD};
use crate::store::{CausalPair, RelationRecord, RelationStore, StoreStats};

/// Candidates fetched per requested result; role filtering may reject some
const OVERFETCH_FACTOR: usize = 3;

/// Semantic retrieval over extracted cause-effect relations
pub struct CausalSearchEngine<P: EmbeddingProvider> {
    provider: P,
    store: RelationStore,
    index: SimilarityIndex,
}

impl<P: EmbeddingProvider> CausalSearchEngine<P> {
    /// Creates an engine with an empty index
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            store: RelationStore::new(),
            index: SimilarityIndex::new(),
        }
    }

    /// Replaces the store and index with `records`.
    ///
    /// Non-causal records are dropped here. Returns the number of records
    /// indexed. If embedding fails, the previous store and index stay in
    /// place.
    pub fn build_index(&mut self, records: Vec<RelationRecord>) -> SearchResult<usize> {
        let received = records.len();
        let store = RelationStore::from_records(records);
        let texts = store.index_texts();

        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            self.provider.embed_texts(&texts)?
        };
        if vectors.len() != texts.len() {
            return Err(SearchError::embedding(
                self.provider.model_id(),
                format!("{} vectors for {} texts", vectors.len(), texts.len()),
            ));
        }

        let index = SimilarityIndex::from_vectors(vectors)?;

        info!(
            received,
            indexed = store.len(),
            dimension = index.dimension(),
            model = self.provider.model_id(),
            "built relation index"
        );

        self.store = store;
        self.index = index;
        Ok(self.store.len())
    }

    /// Runs a typed query.
    ///
    /// Results are sorted by score (descending, ties in retrieval order),
    /// never exceed `top_k`, and never score below the threshold.
    pub fn search(&mut self, query: &Query) -> SearchResult<Vec<ScoredResult>> {
        query.validate()?;

        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let text = query.normalized_text();
        let threshold = query.similarity_threshold;
        let Self {
            provider,
            store,
            index,
        } = self;
        let query_embedding = provider.embed_one(&text)?;

        let search_k = query.top_k.saturating_mul(OVERFETCH_FACTOR).min(store.len());
        let candidates = index.query(&query_embedding, search_k)?;
        debug!(
            query = %text,
            mode = %query.mode,
            candidates = candidates.len(),
            "retrieved candidates"
        );

        let mut results: Vec<ScoredResult> = Vec::with_capacity(search_k);
        for (score, position) in candidates {
            if score < threshold {
                continue;
            }
            let Some(record) = store.get(position) else {
                continue;
            };

            match query.mode {
                QueryMode::General => {
                    if score > threshold {
                        results.push(ScoredResult::new(record, record.relations.clone(), score));
                    }
                }
                QueryMode::FindEffects | QueryMode::FindCauses => {
                    let matching = matching_pairs(provider, &text, record, query.mode, threshold)?;
                    if !matching.is_empty() {
                        results.push(ScoredResult::new(record, matching, score));
                    }
                }
            }

            if results.len() >= query.top_k {
                break;
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(query.top_k);

        debug!(results = results.len(), "search complete");
        Ok(results)
    }

    /// Effects of `cause`: a find-effects search with the default threshold
    pub fn search_by_cause(
        &mut self,
        cause: &str,
        top_k: usize,
    ) -> SearchResult<Vec<ScoredResult>> {
        self.search(
            &Query::new(cause, QueryMode::FindEffects)
                .with_top_k(top_k)
                .with_threshold(DEFAULT_SIMILARITY_THRESHOLD),
        )
    }

    /// Causes of `effect`: a find-causes search with the default threshold
    pub fn search_by_effect(
        &mut self,
        effect: &str,
        top_k: usize,
    ) -> SearchResult<Vec<ScoredResult>> {
        self.search(
            &Query::new(effect, QueryMode::FindCauses)
                .with_top_k(top_k)
                .with_threshold(DEFAULT_SIMILARITY_THRESHOLD),
        )
    }

    /// Every distinct cause in the store, sorted
    pub fn all_causes(&self) -> Vec<String> {
        self.store.all_causes()
    }

    /// Every distinct effect in the store, sorted
    pub fn all_effects(&self) -> Vec<String> {
        self.store.all_effects()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Indexed records in index order
    pub fn records(&self) -> &[RelationRecord] {
        self.store.records()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Pairs whose cause (find effects) or effect (find causes) matches the
/// query, by substring either way or by pairwise similarity above the
/// threshold.
fn matching_pairs<P: EmbeddingProvider>(
    provider: &mut P,
    query: &str,
    record: &RelationRecord,
    mode: QueryMode,
    threshold: f32,
) -> SearchResult<Vec<CausalPair>> {
    let mut matching = Vec::new();
    for pair in &record.relations {
        let role = match mode {
            QueryMode::FindEffects => &pair.cause,
            _ => &pair.effect,
        };
        let role_lower = role.to_lowercase();

        if role_lower.contains(query) || query.contains(role_lower.as_str()) {
            matching.push(pair.clone());
            continue;
        }

        // role phrase scored on its own, not against the whole sentence
        if pairwise_similarity(provider, query, &role_lower)? > threshold {
            matching.push(pair.clone());
        }
    }
    Ok(matching)
}

fn pairwise_similarity<P: EmbeddingProvider>(
    provider: &mut P,
    a: &str,
    b: &str,
) -> SearchResult<f32> {
    let vectors = provider.embed_texts(&[a.to_lowercase(), b.to_lowercase()])?;
    match vectors.as_slice() {
        [left, right] => Ok(cosine_similarity(left, right)),
        _ => Err(SearchError::embedding(
            provider.model_id(),
            format!("expected 2 vectors, got {}", vectors.len()),
        )),
    }
}
