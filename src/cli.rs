// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use causal_search::config::EmbeddingProviderType;
use causal_search::QueryMode;

/// causal-search - Semantic search over extracted cause-effect relations
///
/// Extract causal statements from text with an external relation model, then
/// ask which effects a cause has, which causes an effect has, or search the
/// relations semantically.
#[derive(Parser, Debug)]
#[command(name = "causal-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Query type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliQueryMode {
    /// Query names a cause; show its effects
    #[value(alias = "effects")]
    FindEffects,
    /// Query names an effect; show its causes
    #[value(alias = "causes")]
    FindCauses,
    /// Semantic search over whole relations
    #[default]
    General,
}

impl From<CliQueryMode> for QueryMode {
    fn from(mode: CliQueryMode) -> Self {
        match mode {
            CliQueryMode::FindEffects => QueryMode::FindEffects,
            CliQueryMode::FindCauses => QueryMode::FindCauses,
            CliQueryMode::General => QueryMode::General,
        }
    }
}

/// Embedding provider override
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliProvider {
    /// Built-in all-MiniLM-L6-v2 via fastembed
    Fastembed,
    /// External embedding command from the config file
    Command,
    /// Deterministic feature hashing (offline)
    Hash,
}

impl From<CliProvider> for EmbeddingProviderType {
    fn from(provider: CliProvider) -> Self {
        match provider {
            CliProvider::Fastembed => EmbeddingProviderType::Fastembed,
            CliProvider::Command => EmbeddingProviderType::Command,
            CliProvider::Hash => EmbeddingProviderType::Hash,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a text file into sentences and extract causal relations
    Extract {
        /// Plain-text document to process
        #[arg(short, long)]
        input: PathBuf,

        /// Source identifier stored on each record (defaults to the input path)
        #[arg(short, long)]
        source: Option<String>,

        /// Extractor command (overrides [extraction].command)
        #[arg(long)]
        extractor: Option<String>,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sentences per extractor call
        #[arg(long)]
        batch_size: Option<usize>,

        /// Suppress progress and summary output
        #[arg(short = 'q', long)]
        quiet: bool,
    },

    /// Semantic search over extracted relations
    #[command(alias = "s")]
    Search {
        /// Search query (a cause, an effect, or a question)
        query: String,

        /// Records file produced by `extract`
        #[arg(short, long)]
        records: PathBuf,

        /// Query type
        #[arg(long, value_enum, default_value_t = CliQueryMode::General)]
        mode: CliQueryMode,

        /// Maximum number of results
        #[arg(short = 'm', long = "limit", visible_alias = "top-k")]
        limit: Option<usize>,

        /// Minimum similarity score (0.0-1.0)
        #[arg(short = 't', long)]
        threshold: Option<f32>,

        /// Embedding provider (overrides [embeddings].provider)
        #[arg(long, value_enum)]
        provider: Option<CliProvider>,

        /// Search the query verbatim, keeping question words
        #[arg(long)]
        raw: bool,
    },

    /// List every distinct cause
    Causes {
        /// Records file produced by `extract`
        #[arg(short, long)]
        records: PathBuf,
    },

    /// List every distinct effect
    Effects {
        /// Records file produced by `extract`
        #[arg(short, long)]
        records: PathBuf,
    },

    /// Show summary statistics for a records file
    Stats {
        /// Records file produced by `extract`
        #[arg(short, long)]
        records: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
