// SPDX-License-Identifier: MIT OR Apache-2.0

//! causal-search - Semantic retrieval over extracted cause-effect relations
//!
//! Shared modules for the causal-search CLI: an embedder capability, a flat
//! similarity index, the positional relation store and the query engine
//! that ties them together.

pub mod config;
pub mod embedding;
pub mod engine;
pub mod errors;
pub mod extraction;
pub mod index;
pub mod output;
pub mod query;
pub mod sentences;
pub mod store;

pub use engine::CausalSearchEngine;
pub use errors::{SearchError, SearchResult};
pub use query::{Query, QueryMode, ScoredResult};
pub use store::{CausalPair, RelationRecord, RelationStore, StoreStats};
