// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the retrieval engine.
//!
//! Querying an index that was never built is not an error: it yields an
//! empty result list.

use thiserror::Error;

/// Result type alias for engine operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors raised by the embedder, index, engine and extraction boundary.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The text-to-vector model failed or is unavailable. Never retried here.
    #[error("Embedding failed for model '{model_id}': {message}")]
    Embedding { model_id: String, message: String },

    /// A record from the extractor is missing a required field or has the
    /// wrong shape.
    #[error("Malformed relation record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    /// Query parameters were rejected before any embedding work.
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// A vector does not match the dimension of the index.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The external relation extractor failed.
    #[error("Relation extraction failed: {message}")]
    Extraction { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    pub fn embedding(model_id: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Embedding {
            model_id: model_id.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    pub fn extraction(message: impl std::fmt::Display) -> Self {
        Self::Extraction {
            message: message.to_string(),
        }
    }
}
