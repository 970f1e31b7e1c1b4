// SPDX-License-Identifier: MIT OR Apache-2.0

//! causal-search - Semantic search over extracted cause-effect relations
//!
//! Extracts causal statements through an external relation model and
//! answers find-effects, find-causes and general queries over them with
//! sentence embeddings.

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands, OutputFormat};
use tracing_subscriber::EnvFilter;

use causal_search::config::{Config, ConfigOutputFormat};

fn main() -> Result<()> {
    // Initialize tracing with CAUSAL_SEARCH_LOG env var (e.g., CAUSAL_SEARCH_LOG=debug)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("CAUSAL_SEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let format = cli.format.unwrap_or(match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    match cli.command {
        Commands::Extract {
            input,
            source,
            extractor,
            output,
            batch_size,
            quiet,
        } => {
            commands::extract::run(
                &config,
                &input,
                source.as_deref(),
                extractor.as_deref(),
                output.as_deref(),
                batch_size,
                quiet,
                format,
            )?;
        }
        Commands::Search {
            query,
            records,
            mode,
            limit,
            threshold,
            provider,
            raw,
        } => {
            commands::search::run(
                &config,
                &query,
                &records,
                mode.into(),
                limit,
                threshold,
                provider.map(Into::into),
                raw,
                format,
            )?;
        }
        Commands::Causes { records } => {
            commands::terms::run(&records, commands::terms::Role::Cause, format)?;
        }
        Commands::Effects { records } => {
            commands::terms::run(&records, commands::terms::Role::Effect, format)?;
        }
        Commands::Stats { records } => {
            commands::stats::run(&records, format)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "causal-search", &mut std::io::stdout());
        }
    }

    Ok(())
}
