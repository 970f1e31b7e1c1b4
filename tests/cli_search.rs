// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const RECORDS: &str = r#"[
  {"text": "Smoking causes lung cancer.", "source": "health.pdf", "causal": true,
   "relations": [{"cause": "Smoking", "effect": "lung cancer"}]},
  {"text": "Heavy rain causes flooding.", "source": "weather.pdf", "causal": true,
   "relations": [{"cause": "Heavy rain", "effect": "flooding"}]},
  {"text": "The sky is blue today.", "source": "weather.pdf", "causal": false,
   "relations": []}
]"#;

/// Temp workspace using the offline hash embedder
fn workspace(records: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join(".causal-search.toml"),
        "[embeddings]\nprovider = \"hash\"\n",
    )
    .expect("write config");
    fs::write(dir.path().join("records.json"), records).expect("write records");
    dir
}

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("causal-search"));
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8");
    serde_json::from_str(&stdout).expect("json output")
}

#[test]
fn find_effects_returns_matching_relation() {
    let dir = workspace(RECORDS);
    let assert = cmd(&dir)
        .args([
            "--format",
            "json",
            "search",
            "smoking",
            "--records",
            "records.json",
            "--mode",
            "find-effects",
        ])
        .assert()
        .success();

    let results = stdout_json(assert.get_output());
    let results = results.as_array().expect("array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["source"], "health.pdf");
    assert_eq!(results[0]["relations"][0]["effect"], "lung cancer");
    assert!(results[0]["score"].as_f64().expect("score") >= 0.3);
}

#[test]
fn question_words_are_stripped() {
    let dir = workspace(RECORDS);
    let assert = cmd(&dir)
        .args([
            "--format",
            "json",
            "search",
            "What are the effects of smoking?",
            "--records",
            "records.json",
            "--mode",
            "effects",
        ])
        .assert()
        .success();

    let results = stdout_json(assert.get_output());
    assert_eq!(results.as_array().expect("array").len(), 1);
    assert_eq!(results[0]["relations"][0]["cause"], "Smoking");
}

#[test]
fn find_causes_text_output() {
    let dir = workspace(RECORDS);
    cmd(&dir)
        .args([
            "search",
            "flooding",
            "--records",
            "records.json",
            "--mode",
            "causes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Heavy rain -> flooding"))
        .stdout(predicate::str::contains("weather.pdf"));
}

#[test]
fn threshold_above_one_is_rejected() {
    let dir = workspace(RECORDS);
    cmd(&dir)
        .args([
            "search",
            "smoking",
            "--records",
            "records.json",
            "--threshold",
            "1.01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid query"));
}

#[test]
fn empty_records_give_empty_results() {
    let dir = workspace("[]");
    let assert = cmd(&dir)
        .args([
            "--format",
            "json",
            "search",
            "smoking",
            "--records",
            "records.json",
        ])
        .assert()
        .success();
    assert_eq!(stdout_json(assert.get_output()), serde_json::json!([]));
}

#[test]
fn provider_flag_overrides_config() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("records.json"), RECORDS).expect("write records");
    let assert = cmd(&dir)
        .args([
            "--format",
            "json",
            "search",
            "smoking",
            "--records",
            "records.json",
            "--provider",
            "hash",
            "--limit",
            "1",
        ])
        .assert()
        .success();
    assert_eq!(stdout_json(assert.get_output()).as_array().expect("array").len(), 1);
}

#[test]
fn malformed_records_name_the_position() {
    let dir = workspace(r#"[{"text": "ok", "relations": []}, {"text": "missing relations"}]"#);
    cmd(&dir)
        .args(["stats", "--records", "records.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("position 1"));
}

#[test]
fn causes_and_effects_list_distinct_terms() {
    let dir = workspace(RECORDS);
    let assert = cmd(&dir)
        .args(["--format", "json", "causes", "--records", "records.json"])
        .assert()
        .success();
    assert_eq!(
        stdout_json(assert.get_output()),
        serde_json::json!(["Heavy rain", "Smoking"])
    );

    let assert = cmd(&dir)
        .args(["--format", "json", "effects", "--records", "records.json"])
        .assert()
        .success();
    assert_eq!(
        stdout_json(assert.get_output()),
        serde_json::json!(["flooding", "lung cancer"])
    );
}

#[test]
fn stats_count_causal_records_only() {
    let dir = workspace(RECORDS);
    let assert = cmd(&dir)
        .args(["--format", "json", "stats", "--records", "records.json"])
        .assert()
        .success();
    assert_eq!(
        stdout_json(assert.get_output()),
        serde_json::json!({"records": 2, "relations": 2, "sources": 2})
    );
}

#[test]
fn extract_runs_external_extractor() {
    let dir = workspace("[]");
    fs::write(
        dir.path().join("doc.txt"),
        "Smoking causes lung cancer in adults. The report was long and boring overall.",
    )
    .expect("write doc");
    let extractor = r#"cat > /dev/null; echo '[{"text": "Smoking causes lung cancer in adults.", "causal": true, "relations": [{"cause": "Smoking", "effect": "lung cancer"}]}, {"text": "The report was long and boring overall.", "causal": false, "relations": []}]'"#;

    cmd(&dir)
        .args([
            "extract",
            "--input",
            "doc.txt",
            "--source",
            "doc.pdf",
            "--extractor",
            extractor,
            "--output",
            "out.json",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 causal record(s)"));

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).expect("read"))
            .expect("json");
    let saved = saved.as_array().expect("array");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["source"], "doc.pdf");
    assert_eq!(saved[0]["relations"][0]["effect"], "lung cancer");
}

#[test]
fn extract_without_extractor_fails() {
    let dir = workspace("[]");
    fs::write(dir.path().join("doc.txt"), "Smoking causes lung cancer in adults.")
        .expect("write doc");
    cmd(&dir)
        .args(["extract", "--input", "doc.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No extractor configured"));
}

#[test]
fn completions_generate_script() {
    let dir = workspace("[]");
    cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("causal-search"));
}
