// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations

pub mod extract;
pub mod search;
pub mod stats;
pub mod terms;

use anyhow::{Context, Result};
use std::path::Path;

use causal_search::extraction::load_records;
use causal_search::{RelationRecord, RelationStore};

/// Loads a records file, naming the file on failure
pub(crate) fn read_records(path: &Path) -> Result<Vec<RelationRecord>> {
    load_records(path).with_context(|| format!("Failed to load records from {}", path.display()))
}

/// Loads a records file into a store without embedding anything
pub(crate) fn read_store(path: &Path) -> Result<RelationStore> {
    Ok(RelationStore::from_records(read_records(path)?))
}
