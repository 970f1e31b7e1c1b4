// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - turns text into fixed-dimension vectors
//!
//! The engine depends only on the [`EmbeddingProvider`] capability, so the
//! fastembed model, an external command or the deterministic hash embedder
//! are interchangeable.

pub mod hash;
pub mod provider;

pub use hash::HashEmbedder;
pub use provider::{
    build_provider, CommandProvider, EmbeddingProvider, FastEmbedConfig, FastEmbedder,
};

/// Default embedding dimension for sentence-transformers/all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
