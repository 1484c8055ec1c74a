//! End-to-end analysis of the sample repository
//!
//! Loads `tests/fixtures/sample_repo` through the loader and runs the full
//! pipeline, checking the cross-file results: dependency cycle, call graph
//! resolution, duplicates and parse failure handling.

use archaeologist::config::{AnalysisConfig, DeadCodeScope};
use archaeologist::graph::{CallGraph, Resolution};
use archaeologist::loader;
use archaeologist::pipeline::{AnalysisReport, Pipeline};
use std::path::PathBuf;

fn sample_repo() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_repo")
}

fn analyze(config: AnalysisConfig) -> AnalysisReport {
    let files = loader::load_local(&sample_repo(), &config.loader).expect("load sample repo");
    Pipeline::new(config).analyze(&files).expect("analysis")
}

fn smell_names(report: &AnalysisReport, path: &str, kind: &str) -> Vec<String> {
    let file = report.file(path).expect("file in report");
    let json = serde_json::to_value(&file.smells).unwrap();
    json.as_array()
        .unwrap()
        .iter()
        .filter(|s| s["type"] == kind)
        .map(|s| s["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_files_loaded_in_order() {
    let report = analyze(AnalysisConfig::default());
    let paths: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "broken.py",
            "inventory/__init__.py",
            "inventory/pricing.py",
            "inventory/stock.py",
            "reports.py"
        ]
    );
}

#[test]
fn test_broken_file_is_isolated() {
    let report = analyze(AnalysisConfig::default());
    let broken = report.file("broken.py").unwrap();
    assert!(broken.status.is_failed());
    assert!(broken.smells.is_empty());
    assert_eq!(report.summary.failed_files, 1);
    assert_eq!(report.summary.analyzed_files, 4);
    // everything else still analyzed
    assert_eq!(report.file("reports.py").unwrap().unit.functions.len(), 3);
}

#[test]
fn test_structure_invariants() {
    let report = analyze(AnalysisConfig::default());
    for unit in report.units() {
        for func in &unit.functions {
            assert!(func.line_start <= func.line_end, "{} in {}", func.name, unit.path);
            if let Some(class) = &func.class_name {
                assert!(unit.class(class).is_some(), "{class} missing in {}", unit.path);
            }
        }
    }
    let stock = report.file("inventory/stock.py").unwrap();
    assert_eq!(
        stock.unit.class("Stock").unwrap().methods,
        vec!["__init__", "receive", "needs_reorder", "value"]
    );
}

#[test]
fn test_dependency_cycle() {
    let report = analyze(AnalysisConfig::default());
    let deps = &report.dependencies;
    assert!(deps.has_circular_dependencies);
    assert_eq!(deps.circular_dependencies.len(), 1);
    let mut cycle = deps.circular_dependencies[0].clone();
    cycle.sort();
    assert_eq!(cycle, vec!["inventory/pricing.py", "inventory/stock.py"]);
    // `json` is not a repository file
    assert!(!deps.file_dependencies.contains_key("reports.py"));
    assert!(deps.isolated_files.contains(&"reports.py".to_string()));
}

#[test]
fn test_call_graph_resolution() {
    let report = analyze(AnalysisConfig::default());
    let units: Vec<_> = report.units().cloned().collect();
    let call_graph = CallGraph::build(&units);

    let site = |caller: &str, name: &str| {
        call_graph
            .call_sites()
            .iter()
            .find(|s| s.caller == caller && s.name == name)
            .map(|s| s.resolution.clone())
            .expect("call site")
    };
    assert_eq!(
        site("inventory/stock.py::Stock.value", "unit_price"),
        Resolution::Unique("inventory/pricing.py::unit_price".into())
    );
    assert_eq!(
        site("inventory/pricing.py::stock_value", "value"),
        Resolution::Unique("inventory/stock.py::Stock.value".into())
    );
    assert_eq!(site("reports.py::main", "print"), Resolution::Unresolved);

    let recursive: Vec<&str> = report
        .call_graph
        .analysis
        .recursive_functions
        .iter()
        .map(|r| r.function.as_str())
        .collect();
    assert_eq!(recursive, vec!["reports.py::countdown"]);
}

#[test]
fn test_duplicates_and_smells() {
    let report = analyze(AnalysisConfig::default());

    assert_eq!(report.duplicates.len(), 1);
    let cluster = &report.duplicates[0];
    assert_eq!((cluster.signature.as_str(), cluster.parameter_count), ("add", 2));
    assert_eq!(cluster.count, 2);

    assert_eq!(smell_names(&report, "inventory/stock.py", "too_many_parameters"), vec!["restock_all"]);
    assert_eq!(smell_names(&report, "inventory/stock.py", "non_constant_global"), vec!["audit_log"]);
    assert_eq!(smell_names(&report, "reports.py", "missing_docstring"), vec!["add"]);
    assert_eq!(smell_names(&report, "reports.py", "dead_code"), vec!["add"]);
}

#[test]
fn test_repository_dead_code_scope() {
    let file_scope = analyze(AnalysisConfig::default());
    assert!(smell_names(&file_scope, "inventory/pricing.py", "dead_code").contains(&"unit_price".to_string()));

    let mut config = AnalysisConfig::default();
    config.dead_code.scope = DeadCodeScope::Repository;
    let repo_scope = analyze(config);
    let dead = smell_names(&repo_scope, "inventory/pricing.py", "dead_code");
    assert!(!dead.contains(&"unit_price".to_string()));
    assert!(dead.contains(&"add".to_string()));
}

#[test]
fn test_deterministic_reruns() {
    let first = serde_json::to_string(&analyze(AnalysisConfig::default())).unwrap();
    let second = serde_json::to_string(&analyze(AnalysisConfig::default())).unwrap();
    assert_eq!(first, second);
}
