// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic search over a records file

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::cli::OutputFormat;
use causal_search::config::{Config, EmbeddingProviderType};
use causal_search::embedding::build_provider;
use causal_search::output::{
    colorize_cause, colorize_dim, colorize_effect, colorize_score, colorize_sentence,
    colorize_source, use_colors,
};
use causal_search::query::strip_question_words;
use causal_search::{CausalSearchEngine, Query, QueryMode, ScoredResult};

/// Run the search command
#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &Config,
    query_text: &str,
    records: &Path,
    mode: QueryMode,
    limit: Option<usize>,
    threshold: Option<f32>,
    provider: Option<EmbeddingProviderType>,
    raw: bool,
    format: OutputFormat,
) -> Result<()> {
    let text = if raw || !config.search().strip_question_words() {
        query_text.to_string()
    } else {
        strip_question_words(query_text)
    };
    let query = Query::new(text, mode)
        .with_top_k(config.merge_top_k(limit))
        .with_threshold(config.merge_threshold(threshold));

    // Reject bad parameters before loading a model or embedding records
    query.validate()?;

    let records_list = super::read_records(records)?;

    let mut embeddings = config.embeddings().clone();
    if provider.is_some() {
        embeddings.provider = provider;
    }
    let provider = build_provider(&embeddings)?;

    let mut engine = CausalSearchEngine::new(provider);
    engine
        .build_index(records_list)
        .context("Failed to build relation index")?;

    let results = engine.search(&query)?;
    tracing::debug!(
        query = %query.raw_text,
        mode = %query.mode,
        results = results.len(),
        "search finished"
    );

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Text => print_text(query_text, &query, &results),
    }

    Ok(())
}

fn print_text(query_text: &str, query: &Query, results: &[ScoredResult]) {
    if results.is_empty() {
        println!(
            "{} No {} results for: {}",
            "✗".red(),
            query.mode,
            query_text.yellow()
        );
        return;
    }

    let use_color = use_colors();
    println!(
        "\n{} {} for: {}\n",
        "🔍".cyan(),
        query.mode,
        query_text.yellow()
    );

    for (rank, result) in results.iter().enumerate() {
        println!(
            "{}. [{}] {}",
            rank + 1,
            colorize_score(result.score, use_color),
            colorize_source(&result.source, use_color)
        );
        println!("   {}", colorize_sentence(&result.text, use_color));
        for pair in &result.relations {
            println!(
                "   {} {} {}",
                colorize_cause(&pair.cause, use_color),
                colorize_dim("->", use_color),
                colorize_effect(&pair.effect, use_color)
            );
        }
        println!();
    }

    println!("{} {} result(s)", "✓".green(), results.len());
}
