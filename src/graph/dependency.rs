//! File dependency resolution
//!
//! Maps import statements onto analyzed files and derives the file-level
//! dependency graph. Resolution is a path heuristic: the module path with
//! dots turned into slashes must appear in a file's relative path. Imports
//! that match nothing (standard library, third party) produce no edge.

use super::digraph::{DiGraph, FlatGraph};
use crate::models::{ImportRecord, StructuralUnit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entries kept in each degree ranking
pub const TOP_FILES: usize = 5;

/// Circular dependencies reported at most
pub const MAX_CYCLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependedUpon {
    pub file: String,
    pub dependents: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCount {
    pub file: String,
    pub dependencies: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyAnalysis {
    pub total_files: usize,
    pub graph: FlatGraph,
    /// Importing file -> files it depends on, for files with any
    pub file_dependencies: IndexMap<String, Vec<String>>,
    pub most_depended_upon: Vec<DependedUpon>,
    pub most_dependencies: Vec<DependencyCount>,
    pub circular_dependencies: Vec<Vec<String>>,
    pub isolated_files: Vec<String>,
    pub has_circular_dependencies: bool,
}

/// Candidate path fragments for an import, in statement order
fn candidates(import: &ImportRecord) -> Vec<String> {
    import
        .module_names()
        .into_iter()
        .filter(|m| !m.is_empty())
        .map(|m| m.replace('.', "/"))
        .collect()
}

/// First file whose path contains `candidate`.
///
/// The importing file itself is skipped, so a file never depends on itself.
fn resolve_candidate<'a>(candidate: &str, importer: &str, files: &'a [&'a str]) -> Option<&'a str> {
    files
        .iter()
        .copied()
        .find(|path| *path != importer && path.contains(candidate))
}

/// File name shown for a node
fn file_label(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Build the dependency graph; every analyzed file is a node
pub fn build_graph(units: &[StructuralUnit]) -> DiGraph {
    let mut graph = DiGraph::new();
    for unit in units {
        graph.add_node(unit.path.as_str(), file_label(&unit.path));
    }

    let files: Vec<&str> = units.iter().map(|u| u.path.as_str()).collect();
    for unit in units {
        let Some(source) = graph.node(&unit.path) else {
            continue;
        };
        for import in &unit.imports {
            for candidate in candidates(import) {
                let Some(target) = resolve_candidate(&candidate, &unit.path, &files) else {
                    continue;
                };
                if let Some(target) = graph.node(target) {
                    graph.add_edge(source, target);
                }
            }
        }
    }

    debug!(
        "Dependency graph: {} files, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// Resolve imports across `units` and analyze the resulting graph
pub fn resolve(units: &[StructuralUnit]) -> DependencyAnalysis {
    analyze(&build_graph(units))
}

pub fn analyze(graph: &DiGraph) -> DependencyAnalysis {
    let mut file_dependencies = IndexMap::new();
    for id in 0..graph.node_count() {
        let deps = graph.successors(id);
        if !deps.is_empty() {
            file_dependencies.insert(
                graph.key(id).to_string(),
                deps.iter().map(|&d| graph.key(d).to_string()).collect(),
            );
        }
    }

    let most_depended_upon = graph
        .top_by(|id| graph.in_degree(id), TOP_FILES)
        .into_iter()
        .map(|(id, dependents)| DependedUpon {
            file: graph.key(id).to_string(),
            dependents,
        })
        .collect();

    let most_dependencies = graph
        .top_by(|id| graph.out_degree(id), TOP_FILES)
        .into_iter()
        .map(|(id, dependencies)| DependencyCount {
            file: graph.key(id).to_string(),
            dependencies,
        })
        .collect();

    let circular_dependencies: Vec<Vec<String>> = graph
        .simple_cycles(MAX_CYCLES)
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|id| graph.key(id).to_string()).collect())
        .collect();

    let isolated_files = (0..graph.node_count())
        .filter(|&id| graph.in_degree(id) + graph.out_degree(id) == 0)
        .map(|id| graph.key(id).to_string())
        .collect();

    DependencyAnalysis {
        total_files: graph.node_count(),
        graph: graph.to_flat(),
        file_dependencies,
        most_depended_upon,
        most_dependencies,
        has_circular_dependencies: !circular_dependencies.is_empty(),
        circular_dependencies,
        isolated_files,
    }
}
