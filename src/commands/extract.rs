// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentence splitting and batched relation extraction for one document

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::cli::OutputFormat;
use causal_search::config::Config;
use causal_search::extraction::{extract_in_batches, save_records, CommandExtractor};
use causal_search::sentences::prepare_sentences;

/// Run the extract command
#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &Config,
    input: &Path,
    source: Option<&str>,
    extractor: Option<&str>,
    output: Option<&Path>,
    batch_size: Option<usize>,
    quiet: bool,
    format: OutputFormat,
) -> Result<()> {
    let command = extractor
        .or_else(|| config.extraction().command())
        .context("No extractor configured: pass --extractor or set [extraction].command")?;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let sentences = prepare_sentences(&text, &config.sentences().filter());
    let source = source
        .map(str::to_string)
        .unwrap_or_else(|| input.display().to_string());
    let batch_size = batch_size.unwrap_or_else(|| config.extraction().batch_size());

    tracing::info!(
        input = %input.display(),
        sentences = sentences.len(),
        batch_size,
        "extracting relations"
    );

    let total_batches = sentences.len().div_ceil(batch_size.max(1));
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total_batches as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} batches | Extracting {msg}")
                .expect("valid progress bar template")
                .progress_chars("##."),
        );
        pb
    };
    pb.set_message(source.clone());

    let mut extractor = CommandExtractor::new(command);
    let (records, report) =
        extract_in_batches(&mut extractor, &sentences, &source, batch_size, |done, _| {
            pb.set_position(done as u64)
        })?;
    pb.finish_and_clear();

    match output {
        Some(path) => {
            save_records(path, &records)
                .with_context(|| format!("Failed to write records to {}", path.display()))?;
        }
        None => println!("{}", serde_json::to_string_pretty(&records)?),
    }

    if !quiet {
        match format {
            OutputFormat::Json => {
                eprintln!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                eprintln!(
                    "{} {} causal record(s) from {} sentence(s) in {}",
                    "✓".green(),
                    report.causal,
                    report.sentences,
                    source.cyan()
                );
                if report.failed_batches > 0 {
                    eprintln!(
                        "{} {} of {} batch(es) failed and were skipped",
                        "✗".red(),
                        report.failed_batches,
                        report.batches
                    );
                }
            }
        }
    }

    Ok(())
}
