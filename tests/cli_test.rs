//! CLI contract tests
//!
//! Drives the built binary: JSON output, --output, chains, init and
//! configuration failures.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn archaeologist_bin() -> String {
    env!("CARGO_BIN_EXE_archaeologist").to_string()
}

fn sample_repo() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_repo")
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(archaeologist_bin())
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run archaeologist")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn scratch_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("app.py"),
        "def main():\n    \"\"\"Start.\"\"\"\n    helper()\n\ndef helper():\n    \"\"\"Help.\"\"\"\n    return 42\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_analyze_json_is_clean_stdout() {
    let output = run(&sample_repo(), &["analyze", "--format", "json", "--log-level", "debug"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("stdout is pure JSON");
    assert_eq!(json["summary"]["total_files"], 5);
    assert_eq!(json["summary"]["failed_files"], 1);
    assert_eq!(json["summary"]["dependency_analysis"]["has_circular_dependencies"], true);
    assert_eq!(json["duplicates"][0]["signature"], "add");
    assert!(json["metadata"]["source"].as_str().unwrap().ends_with("sample_repo"));
    assert!(json["metadata"]["analysis_time_seconds"].as_f64().unwrap() >= 0.0);
}

#[test]
fn test_default_command_prints_text_summary() {
    let output = Command::new(archaeologist_bin())
        .arg(sample_repo())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Archaeologist Analysis"));
    assert!(text.contains("Files: 5"));
}

#[test]
fn test_output_file() {
    let out_dir = tempfile::tempdir().unwrap();
    let out_path = out_dir.path().join("report.json");
    let output = run(
        &sample_repo(),
        &["analyze", "--format", "json", "--output", out_path.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(stdout(&output).trim().is_empty());

    let content = std::fs::read_to_string(&out_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["files"].is_array());
}

#[test]
fn test_dead_code_scope_flag() {
    let count_dead = |args: &[&str]| -> usize {
        let output = run(&sample_repo(), args);
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        json["summary"]["smells_by_type"]["dead_code"].as_u64().unwrap_or(0) as usize
    };
    let file_scope = count_dead(&["analyze", "--format", "json"]);
    let repo_scope = count_dead(&["analyze", "--format", "json", "--dead-code-scope", "repository"]);
    assert!(repo_scope < file_scope);
}

#[test]
fn test_chains() {
    let dir = scratch_repo();
    let output = run(dir.path(), &["chains", "app.py::main"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("app.py::main -> app.py::helper"));

    let missing = run(dir.path(), &["chains", "app.py::nope"]);
    assert!(!missing.status.success());
}

#[test]
fn test_init_writes_config_once() {
    let dir = scratch_repo();
    let output = run(dir.path(), &["init"]);
    assert!(output.status.success());

    let config_path = dir.path().join("archaeologist.toml");
    let written = std::fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("[thresholds]"));

    std::fs::write(&config_path, "[thresholds]\nmax_parameters = 2\n").unwrap();
    let again = run(dir.path(), &["init"]);
    assert!(again.status.success());
    assert_eq!(
        std::fs::read_to_string(&config_path).unwrap(),
        "[thresholds]\nmax_parameters = 2\n"
    );
}

#[test]
fn test_invalid_config_is_fatal() {
    let dir = scratch_repo();
    std::fs::write(dir.path().join("archaeologist.toml"), "[thresholds]\nmax_complexity = 0\n").unwrap();
    let output = run(dir.path(), &["analyze", "--format", "json"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_explicit_config_is_fatal() {
    let dir = scratch_repo();
    let output = run(dir.path(), &["analyze", "--config", "does-not-exist.toml"]);
    assert!(!output.status.success());
}
