//! Function call graph
//!
//! Pass 1 registers every function under its id (`file::name` or
//! `file::Class.name`); a later function with the same id collapses into
//! the first. Pass 2 resolves each call name of each function against the
//! frozen registry, in parallel per file, and merges edges in file order.
//!
//! Resolution is by name only. A call can land on several definitions;
//! that is reported as [`Resolution::Ambiguous`] and every candidate gets
//! an edge.

use super::digraph::{DiGraph, FlatGraph, NodeId};
use crate::metrics::round2;
use crate::models::StructuralUnit;
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entries kept in the most-called / most-calls rankings
pub const TOP_FUNCTIONS: usize = 5;
/// Longest cycle counted as mutual recursion
pub const MAX_RECURSION_CYCLE: usize = 5;
/// Recursive functions reported at most
pub const MAX_RECURSIVE_FUNCTIONS: usize = 10;
/// Default depth for [`CallGraph::call_chains`]
pub const DEFAULT_CHAIN_DEPTH: usize = 5;
/// Chains returned at most
pub const MAX_CHAINS: usize = 10;

/// Cycles enumerated while looking for mutual recursion
const CYCLE_SCAN_LIMIT: usize = 1000;

/// Where a call name landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "targets", rename_all = "snake_case")]
pub enum Resolution {
    Unresolved,
    Unique(String),
    Ambiguous(Vec<String>),
}

impl Resolution {
    fn from_candidates(mut ids: Vec<String>) -> Self {
        match ids.len() {
            0 => Resolution::Unresolved,
            1 => Resolution::Unique(ids.remove(0)),
            _ => Resolution::Ambiguous(ids),
        }
    }

    pub fn targets(&self) -> &[String] {
        match self {
            Resolution::Unresolved => &[],
            Resolution::Unique(id) => std::slice::from_ref(id),
            Resolution::Ambiguous(ids) => ids,
        }
    }
}

/// A registered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub id: String,
    pub name: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub line: u32,
    pub complexity: u32,
}

/// One call name of one function and how it resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub caller: String,
    pub name: String,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallCount {
    pub function: String,
    pub name: String,
    pub calls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveFunction {
    pub function: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallGraphAnalysis {
    pub total_functions: usize,
    pub total_calls: usize,
    pub most_called: Vec<FunctionCallCount>,
    pub most_calls: Vec<FunctionCallCount>,
    pub recursive_functions: Vec<RecursiveFunction>,
    /// Functions that call nothing that resolved
    pub dead_end_functions: usize,
    pub average_calls_per_function: f64,
    pub unique_calls: usize,
    pub ambiguous_calls: usize,
    pub unresolved_calls: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    graph: DiGraph,
    definitions: IndexMap<String, FunctionDefinition>,
    call_sites: Vec<CallSite>,
}

/// Frozen view of pass 1 used while resolving
struct Registry<'a> {
    definitions: &'a IndexMap<String, FunctionDefinition>,
    /// Bare function name -> ids, registration order
    by_name: FxHashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Registry<'a> {
    fn new(definitions: &'a IndexMap<String, FunctionDefinition>) -> Self {
        let mut by_name: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for def in definitions.values() {
            by_name.entry(def.name.as_str()).or_default().push(def.id.as_str());
        }
        Self {
            definitions,
            by_name,
        }
    }

    /// Candidates in priority order: same-file free function, method of the
    /// caller's own class, then (only if neither exists) every function with
    /// that name anywhere.
    fn resolve(&self, file: &str, caller_class: Option<&str>, name: &str) -> Resolution {
        let mut ids = Vec::new();

        let local = format!("{file}::{name}");
        if self.definitions.contains_key(&local) {
            ids.push(local);
        }
        if let Some(class) = caller_class {
            let method = format!("{file}::{class}.{name}");
            if self.definitions.contains_key(&method) {
                ids.push(method);
            }
        }
        if ids.is_empty() {
            if let Some(global) = self.by_name.get(name) {
                ids.extend(global.iter().map(|id| id.to_string()));
            }
        }

        Resolution::from_candidates(ids)
    }
}

impl CallGraph {
    pub fn build(units: &[StructuralUnit]) -> Self {
        let mut graph = DiGraph::new();
        let mut definitions: IndexMap<String, FunctionDefinition> = IndexMap::new();

        for unit in units {
            for func in &unit.functions {
                let id = func.qualified_id(&unit.path);
                if definitions.contains_key(&id) {
                    continue;
                }
                graph.add_node(id.as_str(), func.name.as_str());
                definitions.insert(
                    id.clone(),
                    FunctionDefinition {
                        id,
                        name: func.name.clone(),
                        file: unit.path.clone(),
                        class_name: func.class_name.clone(),
                        line: func.line_start,
                        complexity: func.complexity,
                    },
                );
            }
        }

        let registry = Registry::new(&definitions);
        let per_file: Vec<Vec<CallSite>> = units
            .par_iter()
            .map(|unit| {
                let mut sites = Vec::new();
                for func in &unit.functions {
                    let caller = func.qualified_id(&unit.path);
                    for name in &func.calls {
                        sites.push(CallSite {
                            caller: caller.clone(),
                            name: name.clone(),
                            resolution: registry.resolve(&unit.path, func.class_name.as_deref(), name),
                        });
                    }
                }
                sites
            })
            .collect();

        let call_sites: Vec<CallSite> = per_file.into_iter().flatten().collect();
        for site in &call_sites {
            let Some(caller) = graph.node(&site.caller) else {
                continue;
            };
            for target in site.resolution.targets() {
                if let Some(callee) = graph.node(target) {
                    graph.add_edge(caller, callee);
                }
            }
        }

        debug!(
            "Call graph: {} functions, {} edges, {} call sites",
            graph.node_count(),
            graph.edge_count(),
            call_sites.len()
        );

        Self {
            graph,
            definitions,
            call_sites,
        }
    }

    pub fn graph(&self) -> &DiGraph {
        &self.graph
    }

    pub fn definitions(&self) -> &IndexMap<String, FunctionDefinition> {
        &self.definitions
    }

    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    pub fn to_flat(&self) -> FlatGraph {
        self.graph.to_flat()
    }

    fn counts(&self, ranked: Vec<(NodeId, usize)>) -> Vec<FunctionCallCount> {
        ranked
            .into_iter()
            .map(|(id, calls)| FunctionCallCount {
                function: self.graph.key(id).to_string(),
                name: self.graph.label(id).to_string(),
                calls,
            })
            .collect()
    }

    /// Self-recursive functions first, then members of short cycles
    fn recursive_functions(&self) -> Vec<RecursiveFunction> {
        let g = &self.graph;
        let self_loops = (0..g.node_count()).filter(|&id| g.has_edge(id, id));
        let cycle_members = g
            .cycles_up_to(MAX_RECURSION_CYCLE, CYCLE_SCAN_LIMIT)
            .into_iter()
            .flatten();

        let mut seen = FxHashSet::default();
        self_loops
            .chain(cycle_members)
            .filter(|id| seen.insert(*id))
            .take(MAX_RECURSIVE_FUNCTIONS)
            .map(|id| RecursiveFunction {
                function: g.key(id).to_string(),
                name: g.label(id).to_string(),
            })
            .collect()
    }

    pub fn analyze(&self) -> CallGraphAnalysis {
        let g = &self.graph;
        if g.node_count() == 0 {
            return CallGraphAnalysis::default();
        }

        let mut analysis = CallGraphAnalysis {
            total_functions: g.node_count(),
            total_calls: g.edge_count(),
            most_called: self.counts(g.top_by(|id| g.in_degree(id), TOP_FUNCTIONS)),
            most_calls: self.counts(g.top_by(|id| g.out_degree(id), TOP_FUNCTIONS)),
            recursive_functions: self.recursive_functions(),
            dead_end_functions: (0..g.node_count()).filter(|&id| g.out_degree(id) == 0).count(),
            average_calls_per_function: round2(g.edge_count() as f64 / g.node_count() as f64),
            ..Default::default()
        };

        for site in &self.call_sites {
            match site.resolution {
                Resolution::Unresolved => analysis.unresolved_calls += 1,
                Resolution::Unique(_) => analysis.unique_calls += 1,
                Resolution::Ambiguous(_) => analysis.ambiguous_calls += 1,
            }
        }

        analysis
    }

    /// Call chains from `start`, following edges depth first.
    ///
    /// A chain ends at `max_depth` calls or where every successor is already
    /// on the chain. At most [`MAX_CHAINS`] chains; an unknown id yields none.
    pub fn call_chains(&self, start: &str, max_depth: usize) -> Vec<Vec<String>> {
        let Some(start) = self.graph.node(start) else {
            return Vec::new();
        };
        let mut chains = Vec::new();
        let mut chain = vec![start];
        self.extend_chain(&mut chain, max_depth, &mut chains);

        chains
            .into_iter()
            .map(|ids| ids.into_iter().map(|id| self.graph.key(id).to_string()).collect())
            .collect()
    }

    fn extend_chain(&self, chain: &mut Vec<NodeId>, max_depth: usize, chains: &mut Vec<Vec<NodeId>>) {
        if chains.len() >= MAX_CHAINS {
            return;
        }
        let depth = chain.len() - 1;
        let Some(&node) = chain.last() else {
            return;
        };
        let next: Vec<NodeId> = if depth >= max_depth {
            Vec::new()
        } else {
            self.graph
                .successors(node)
                .iter()
                .copied()
                .filter(|s| !chain.contains(s))
                .collect()
        };

        if next.is_empty() {
            chains.push(chain.clone());
            return;
        }
        for successor in next {
            if chains.len() >= MAX_CHAINS {
                return;
            }
            chain.push(successor);
            self.extend_chain(chain, max_depth, chains);
            chain.pop();
        }
    }
}
