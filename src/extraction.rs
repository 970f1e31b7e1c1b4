// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relation extraction boundary.
//!
//! The causal relation model is an external collaborator: anything that maps
//! sentences to [`RelationRecord`]s implements [`RelationExtractor`]. Records
//! coming across this boundary are validated strictly; a malformed record
//! aborts the run instead of being skipped, since skipping would shift the
//! store out of alignment with what the extractor reported.

use anyhow::Context;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::errors::{SearchError, SearchResult};
use crate::store::RelationRecord;

/// Sentences sent to the extractor per call
pub const DEFAULT_EXTRACTION_BATCH_SIZE: usize = 32;

/// Capability: sentences in, one record per analysed sentence out
pub trait RelationExtractor {
    fn extract(&mut self, sentences: &[String]) -> SearchResult<Vec<RelationRecord>>;
}

/// Extractor that shells out to an external command.
///
/// The command reads `{"sentences": [...]}` on stdin and prints a JSON array
/// of records, or an object holding one under `results` or `records`.
pub struct CommandExtractor {
    command: String,
}

impl CommandExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn run_command(&self, sentences: &[String]) -> anyhow::Result<Value> {
        let payload = serde_json::json!({ "sentences": sentences });

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn extractor command: {}", self.command))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.to_string().as_bytes())
                .context("Failed to write sentences to extractor stdin")?;
        }

        let output = child
            .wait_with_output()
            .context("Failed to read extractor output")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Extractor command failed (status {}): {}",
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim()).context("Failed to parse extractor output as JSON")
    }
}

impl RelationExtractor for CommandExtractor {
    fn extract(&mut self, sentences: &[String]) -> SearchResult<Vec<RelationRecord>> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }
        let value = self
            .run_command(sentences)
            .map_err(|e| SearchError::extraction(format!("{e:#}")))?;
        parse_records(value)
    }
}

/// Parses extractor output into records.
///
/// Accepts a JSON array, or an object with the array under `results` or
/// `records`. A missing or ill-typed `text` or `relations` field fails with
/// [`SearchError::MalformedRecord`] naming the offending position.
pub fn parse_records(value: Value) -> SearchResult<Vec<RelationRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results").or_else(|| obj.remove("records")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SearchError::MalformedRecord {
                    position: 0,
                    reason: "expected an array of records under `results` or `records`".into(),
                })
            }
        },
        _ => {
            return Err(SearchError::MalformedRecord {
                position: 0,
                reason: "expected a JSON array of records".into(),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            serde_json::from_value::<RelationRecord>(item).map_err(|e| {
                SearchError::MalformedRecord {
                    position,
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// Reads records from a JSON file written by `extract`
pub fn load_records(path: &Path) -> SearchResult<Vec<RelationRecord>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    parse_records(value)
}

/// Writes records as pretty-printed JSON
pub fn save_records(path: &Path, records: &[RelationRecord]) -> SearchResult<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Counters for one batched extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExtractionReport {
    /// Sentences submitted
    pub sentences: usize,
    pub batches: usize,
    /// Batches the extractor failed on and that were skipped
    pub failed_batches: usize,
    /// Causal records kept
    pub causal: usize,
}

/// Runs `extractor` over `sentences` in batches of `batch_size`.
///
/// Every returned record gets `source` stamped on it and only causal records
/// are kept. A batch the extractor fails on is logged and skipped; a
/// malformed record aborts the run. `on_batch` is called after each batch
/// with (batches done, total batches).
pub fn extract_in_batches<E, F>(
    extractor: &mut E,
    sentences: &[String],
    source: &str,
    batch_size: usize,
    mut on_batch: F,
) -> SearchResult<(Vec<RelationRecord>, ExtractionReport)>
where
    E: RelationExtractor + ?Sized,
    F: FnMut(usize, usize),
{
    let batch_size = batch_size.max(1);
    let total_batches = sentences.len().div_ceil(batch_size);
    let mut report = ExtractionReport {
        sentences: sentences.len(),
        batches: total_batches,
        ..Default::default()
    };
    let mut kept = Vec::new();

    for (i, batch) in sentences.chunks(batch_size).enumerate() {
        match extractor.extract(batch) {
            Ok(records) => {
                debug!(batch = i + 1, total_batches, records = records.len(), "extracted batch");
                kept.extend(
                    records
                        .into_iter()
                        .filter(|r| r.causal)
                        .map(|mut r| {
                            r.source = source.to_string();
                            r
                        }),
                );
            }
            Err(err @ SearchError::MalformedRecord { .. }) => return Err(err),
            Err(err) => {
                warn!(batch = i + 1, total_batches, error = %err, "skipping failed extraction batch");
                report.failed_batches += 1;
            }
        }
        on_batch(i + 1, total_batches);
    }

    report.causal = kept.len();
    Ok((kept, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    /// Marks sentences containing "causes" as causal, splitting on that word
    struct KeywordExtractor {
        calls: usize,
        fail_on_call: Option<usize>,
    }

    impl RelationExtractor for KeywordExtractor {
        fn extract(&mut self, sentences: &[String]) -> SearchResult<Vec<RelationRecord>> {
            self.calls += 1;
            if self.fail_on_call == Some(self.calls) {
                return Err(SearchError::extraction("model crashed"));
            }
            Ok(sentences
                .iter()
                .map(|s| match s.split_once(" causes ") {
                    Some((cause, effect)) => RelationRecord::new(s.clone(), "ignored")
                        .with_relation(cause, effect.trim_end_matches('.')),
                    None => RelationRecord::new(s.clone(), "ignored").with_causal(false),
                })
                .collect())
        }
    }

    fn sentences() -> Vec<String> {
        vec![
            "Smoking causes cancer.".to_string(),
            "The sky is blue today.".to_string(),
            "Heat causes drought.".to_string(),
        ]
    }

    #[test]
    fn test_parse_records_shapes() {
        let records = parse_records(json!([
            {"text": "Smoking causes cancer.", "source": "a.pdf", "causal": true,
             "relations": [{"cause": "Smoking", "effect": "cancer"}]}
        ]))
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relations[0].effect, "cancer");

        let records = parse_records(json!({"results": [{"text": "x", "relations": []}]})).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].causal);
    }

    #[test]
    fn test_parse_records_malformed() {
        let err = parse_records(json!([
            {"text": "ok", "relations": []},
            {"text": "no relations field"}
        ]))
        .unwrap_err();
        match err {
            SearchError::MalformedRecord { position, reason } => {
                assert_eq!(position, 1);
                assert!(reason.contains("relations"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_records(json!([{"relations": []}])).is_err());
        assert!(parse_records(json!([{"text": 5, "relations": []}])).is_err());
        assert!(parse_records(json!("records")).is_err());
    }

    #[test]
    fn test_extract_in_batches_stamps_source_and_filters() {
        let mut extractor = KeywordExtractor {
            calls: 0,
            fail_on_call: None,
        };
        let mut progress = Vec::new();
        let (records, report) =
            extract_in_batches(&mut extractor, &sentences(), "doc.pdf", 2, |done, total| {
                progress.push((done, total))
            })
            .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == "doc.pdf"));
        assert_eq!(records[1].relations[0].cause, "Heat");
        assert_eq!(
            report,
            ExtractionReport {
                sentences: 3,
                batches: 2,
                failed_batches: 0,
                causal: 2
            }
        );
        assert_eq!(progress, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_extract_in_batches_skips_failed_batch() {
        let mut extractor = KeywordExtractor {
            calls: 0,
            fail_on_call: Some(1),
        };
        let (records, report) =
            extract_in_batches(&mut extractor, &sentences(), "doc.pdf", 2, |_, _| {}).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Heat causes drought.");
        assert_eq!(report.failed_batches, 1);
    }

    #[test]
    fn test_command_extractor() {
        let command = r#"cat > /dev/null; echo '[{"text": "Heat causes drought.", "causal": true, "relations": [{"cause": "Heat", "effect": "drought"}]}, {"text": "Nothing here.", "causal": false, "relations": []}]'"#;
        let mut extractor = CommandExtractor::new(command);
        let records = extractor
            .extract(&["Heat causes drought.".to_string()])
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[1].causal);
    }

    #[test]
    fn test_command_extractor_failure() {
        let mut extractor = CommandExtractor::new("cat > /dev/null; exit 2");
        let err = extractor.extract(&["a sentence".to_string()]).unwrap_err();
        assert!(matches!(err, SearchError::Extraction { .. }));
    }

    #[test]
    fn test_save_and_load_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        let records = vec![
            RelationRecord::new("Smoking causes cancer.", "a.pdf").with_relation("Smoking", "cancer"),
        ];
        save_records(&path, &records).unwrap();
        assert_eq!(load_records(&path).unwrap(), records);
    }
}
