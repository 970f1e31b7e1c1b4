// SPDX-License-Identifier: MIT OR Apache-2.0

//! List distinct causes or effects

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::OutputFormat;
use causal_search::output::{colorize_cause, colorize_effect, use_colors};

/// Which side of the relations to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Cause,
    Effect,
}

impl Role {
    fn plural(self) -> &'static str {
        match self {
            Role::Cause => "causes",
            Role::Effect => "effects",
        }
    }
}

/// Run the causes / effects command
pub fn run(records: &Path, role: Role, format: OutputFormat) -> Result<()> {
    let store = super::read_store(records)?;
    let terms = match role {
        Role::Cause => store.all_causes(),
        Role::Effect => store.all_effects(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&terms)?);
        }
        OutputFormat::Text => {
            if terms.is_empty() {
                println!("{} No {} found in {}", "✗".red(), role.plural(), records.display());
                return Ok(());
            }

            let use_color = use_colors();
            println!("\n{} {} distinct {}\n", "✓".green(), terms.len(), role.plural());
            for term in &terms {
                let term = match role {
                    Role::Cause => colorize_cause(term, use_color),
                    Role::Effect => colorize_effect(term, use_color),
                };
                println!("  {}", term);
            }
        }
    }

    Ok(())
}
