//! Output and color utilities for consistent terminal formatting
//!
//! Provides shared color functions respecting NO_COLOR environment variable.

use colored::Colorize;

/// Check if colors should be used (respects NO_COLOR env var)
pub fn use_colors() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Colorize source document (cyan)
pub fn colorize_source(text: &str, use_color: bool) -> String {
    if use_color {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize similarity score (yellow, three decimals)
pub fn colorize_score(score: f32, use_color: bool) -> String {
    let text = format!("{:.3}", score);
    if use_color {
        text.yellow().to_string()
    } else {
        text
    }
}

/// Colorize cause phrase (red bold)
pub fn colorize_cause(text: &str, use_color: bool) -> String {
    if use_color {
        text.red().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize effect phrase (green bold)
pub fn colorize_effect(text: &str, use_color: bool) -> String {
    if use_color {
        text.green().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize sentence text (italic)
pub fn colorize_sentence(text: &str, use_color: bool) -> String {
    if use_color {
        text.italic().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize secondary information (dimmed)
pub fn colorize_dim(text: &str, use_color: bool) -> String {
    if use_color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_without_color() {
        assert_eq!(colorize_score(0.51234, false), "0.512");
        assert_eq!(colorize_cause("Smoking", false), "Smoking");
        assert_eq!(colorize_effect("cancer", false), "cancer");
        assert_eq!(colorize_source("a.pdf", false), "a.pdf");
    }
}
