// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for causal-search
//!
//! Loads configuration from .causal-search.toml in current directory or
//! ~/.config/causal-search/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::query::DEFAULT_TOP_K;
use crate::sentences::SentenceFilter;

/// Name of the per-directory configuration file
pub const CONFIG_FILE_NAME: &str = ".causal-search.toml";

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// Built-in fastembed model (all-MiniLM-L6-v2)
    #[default]
    Fastembed,
    /// External command speaking JSON over stdin/stdout
    Command,
    /// Deterministic feature-hashing embedder, no model download
    Hash,
}

impl std::str::FromStr for EmbeddingProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fastembed" | "builtin" => Ok(EmbeddingProviderType::Fastembed),
            "command" => Ok(EmbeddingProviderType::Command),
            "hash" => Ok(EmbeddingProviderType::Hash),
            _ => Err(format!("Unknown embedding provider: {}", s)),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results returned when the CLI is not given --limit
    pub default_top_k: Option<usize>,
    /// Minimum similarity for a result to be returned (0.0-1.0)
    pub similarity_threshold: Option<f32>,
    /// Drop question words ("what", "causes", ...) from queries before searching
    pub strip_question_words: Option<bool>,
}

impl SearchConfig {
    /// Get default top_k (defaults to 5)
    pub fn default_top_k(&self) -> usize {
        self.default_top_k.unwrap_or(DEFAULT_TOP_K)
    }

    /// Get similarity threshold (defaults to 0.3)
    pub fn similarity_threshold(&self) -> f32 {
        self.similarity_threshold.unwrap_or(0.3)
    }

    /// Get question word stripping (defaults to true)
    pub fn strip_question_words(&self) -> bool {
        self.strip_question_words.unwrap_or(true)
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type (fastembed, command, hash)
    pub provider: Option<EmbeddingProviderType>,
    /// Model identifier for the embedding provider
    pub model: Option<String>,
    /// Command to execute for command provider
    pub command: Option<String>,
    /// Texts per inference batch
    pub batch_size: Option<usize>,
    /// Texts longer than this many characters are truncated before embedding
    pub max_chars: Option<usize>,
    /// L2-normalize provider output
    pub normalize: Option<bool>,
    /// Vector dimension of the hash provider
    pub dimension: Option<usize>,
}

impl EmbeddingConfig {
    /// Get provider type (defaults to Fastembed)
    pub fn provider(&self) -> EmbeddingProviderType {
        self.provider.unwrap_or_default()
    }

    /// Get model identifier (defaults to "all-MiniLM-L6-v2")
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("all-MiniLM-L6-v2")
    }

    /// Get command (defaults to "embedder")
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or("embedder")
    }

    /// Get batch size (defaults to 64)
    pub fn batch_size(&self) -> usize {
        self.batch_size.filter(|&b| b > 0).unwrap_or(64)
    }

    /// Get max chars (defaults to 2000)
    pub fn max_chars(&self) -> usize {
        self.max_chars.filter(|&c| c > 0).unwrap_or(2000)
    }

    /// Get normalize (defaults to true)
    pub fn normalize(&self) -> bool {
        self.normalize.unwrap_or(true)
    }

    /// Get hash provider dimension (defaults to 384)
    pub fn dimension(&self) -> usize {
        self.dimension
            .filter(|&d| d > 0)
            .unwrap_or(crate::embedding::DEFAULT_EMBEDDING_DIM)
    }
}

/// Relation extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Command wrapping the causal relation model
    pub command: Option<String>,
    /// Sentences per extraction batch
    pub batch_size: Option<usize>,
}

impl ExtractionConfig {
    /// Get extractor command, if configured
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Get batch size (defaults to 32)
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .filter(|&b| b > 0)
            .unwrap_or(crate::extraction::DEFAULT_EXTRACTION_BATCH_SIZE)
    }
}

/// Sentence filtering configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SentenceConfig {
    pub min_chars: Option<usize>,
    pub max_chars: Option<usize>,
    /// Minimum share of alphabetic characters in a sentence
    pub min_alpha_ratio: Option<f32>,
}

impl SentenceConfig {
    /// Build a sentence filter, falling back to the defaults (15, 100, 0.5)
    pub fn filter(&self) -> SentenceFilter {
        let defaults = SentenceFilter::default();
        SentenceFilter {
            min_chars: self.min_chars.unwrap_or(defaults.min_chars),
            max_chars: self.max_chars.unwrap_or(defaults.max_chars),
            min_alpha_ratio: self.min_alpha_ratio.unwrap_or(defaults.min_alpha_ratio),
        }
    }
}

/// Configuration loaded from .causal-search.toml or ~/.config/causal-search/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: Option<String>,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,

    /// Extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Sentence filtering configuration
    #[serde(default)]
    pub sentences: SentenceConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .causal-search.toml in current directory
    /// 2. ~/.config/causal-search/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(CONFIG_FILE_NAME)) {
            return config;
        }

        if let Some(config_path) = user_config_path() {
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Load from an explicit path, returning None if missing or unparsable
    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::parse(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                Some(config)
            }
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format
            .as_ref()
            .and_then(|s| match s.to_lowercase().as_str() {
                "json" => Some(ConfigOutputFormat::Json),
                "text" => Some(ConfigOutputFormat::Text),
                _ => None,
            })
    }

    /// Merge CLI limit with config (CLI wins)
    pub fn merge_top_k(&self, cli_value: Option<usize>) -> usize {
        cli_value.unwrap_or_else(|| self.search.default_top_k())
    }

    /// Merge CLI threshold with config (CLI wins)
    pub fn merge_threshold(&self, cli_value: Option<f32>) -> f32 {
        cli_value.unwrap_or_else(|| self.search.similarity_threshold())
    }

    /// Get the search configuration
    pub fn search(&self) -> &SearchConfig {
        &self.search
    }

    /// Get the embedding configuration
    pub fn embeddings(&self) -> &EmbeddingConfig {
        &self.embeddings
    }

    /// Get the extraction configuration
    pub fn extraction(&self) -> &ExtractionConfig {
        &self.extraction
    }

    /// Get the sentence configuration
    pub fn sentences(&self) -> &SentenceConfig {
        &self.sentences
    }
}

/// Location of the user-level configuration file, if a home directory exists
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("causal-search")
            .join("config.toml")
    })
}
