// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary statistics for a records file

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::OutputFormat;

/// Run the stats command
pub fn run(records: &Path, format: OutputFormat) -> Result<()> {
    let store = super::read_store(records)?;
    let stats = store.stats();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Text => {
            println!("\n{} {}\n", "📊".cyan(), records.display());
            println!("  Causal records: {}", stats.records.to_string().yellow());
            println!("  Relations:      {}", stats.relations.to_string().yellow());
            println!("  Sources:        {}", stats.sources.to_string().yellow());
        }
    }

    Ok(())
}
