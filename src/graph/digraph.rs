//! Owned directed graph
//!
//! Adjacency lists over dense integer node ids with a label side table.
//! Edges are deduplicated; self-loops are allowed. Iteration order is
//! insertion order everywhere, so every algorithm here is deterministic.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    keys: Vec<String>,
    labels: Vec<String>,
    index: FxHashMap<String, NodeId>,
    succ: Vec<Vec<NodeId>>,
    pred: Vec<Vec<NodeId>>,
    edges: Vec<(NodeId, NodeId)>,
    edge_set: FxHashSet<(NodeId, NodeId)>,
}

/// Node of the serializable graph view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode {
    pub id: String,
    pub label: String,
    pub in_degree: usize,
    pub out_degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEdge {
    pub source: String,
    pub target: String,
}

/// `{nodes, edges}` view of a graph, ready for serialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatGraph {
    pub nodes: Vec<FlatNode>,
    pub edges: Vec<FlatEdge>,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node keyed by `key`. An existing key keeps its first label.
    pub fn add_node(&mut self, key: impl Into<String>, label: impl Into<String>) -> NodeId {
        let key = key.into();
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.labels.push(label.into());
        self.succ.push(Vec::new());
        self.pred.push(Vec::new());
        id
    }

    /// Add an edge; returns false if it already existed
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.edge_set.insert((from, to)) {
            return false;
        }
        self.succ[from].push(to);
        self.pred[to].push(from);
        self.edges.push((from, to));
        true
    }

    pub fn node(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn key(&self, id: NodeId) -> &str {
        &self.keys[id]
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.labels[id]
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        &self.succ[id]
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        &self.pred[id]
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.pred[id].len()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.succ[id].len()
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_set.contains(&(from, to))
    }

    /// Nodes ranked by `degree`, highest first, ties in insertion order.
    /// Only nodes with a positive degree are kept.
    pub fn top_by(&self, degree: impl Fn(NodeId) -> usize, limit: usize) -> Vec<(NodeId, usize)> {
        let mut ranked: Vec<(NodeId, usize)> = (0..self.node_count())
            .map(|id| (id, degree(id)))
            .filter(|&(_, d)| d > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    /// Strongly connected components (Tarjan), in completion order
    pub fn strongly_connected_components(&self) -> Vec<Vec<NodeId>> {
        let roots: Vec<NodeId> = (0..self.node_count()).collect();
        self.tarjan(&roots, |_| true)
    }

    /// Iterative Tarjan over the nodes accepted by `include`
    fn tarjan(&self, roots: &[NodeId], include: impl Fn(NodeId) -> bool) -> Vec<Vec<NodeId>> {
        const UNVISITED: usize = usize::MAX;
        let n = self.node_count();
        let mut index = vec![UNVISITED; n];
        let mut lowlink = vec![0; n];
        let mut on_stack = vec![false; n];
        let mut stack = Vec::new();
        let mut next = 0;
        let mut components = Vec::new();

        for &root in roots {
            if !include(root) || index[root] != UNVISITED {
                continue;
            }
            index[root] = next;
            lowlink[root] = next;
            next += 1;
            stack.push(root);
            on_stack[root] = true;
            let mut frames: Vec<(NodeId, usize)> = vec![(root, 0)];

            while let Some(&(v, pos)) = frames.last() {
                if pos < self.succ[v].len() {
                    if let Some(top) = frames.last_mut() {
                        top.1 += 1;
                    }
                    let w = self.succ[v][pos];
                    if !include(w) {
                        continue;
                    }
                    if index[w] == UNVISITED {
                        index[w] = next;
                        lowlink[w] = next;
                        next += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        frames.push((w, 0));
                    } else if on_stack[w] {
                        lowlink[v] = lowlink[v].min(index[w]);
                    }
                    continue;
                }

                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }
                if lowlink[v] == index[v] {
                    let mut component = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    component.reverse();
                    components.push(component);
                }
            }
        }

        components
    }

    /// Elementary circuits (Johnson's algorithm), at most `limit` of them.
    ///
    /// Each cycle starts at its lowest node id and lists nodes in edge order.
    pub fn simple_cycles(&self, limit: usize) -> Vec<Vec<NodeId>> {
        let n = self.node_count();
        let mut cycles = Vec::new();
        let mut blocked = vec![false; n];
        let mut blocked_by: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        let mut in_scc = vec![false; n];
        let mut path = Vec::new();

        for start in 0..n {
            if cycles.len() >= limit {
                break;
            }
            // component of `start` in the subgraph of nodes >= start
            let Some(component) = self
                .tarjan(&[start], |v| v >= start)
                .into_iter()
                .find(|c| c.contains(&start))
            else {
                continue;
            };
            if component.len() == 1 && !self.has_edge(start, start) {
                continue;
            }

            for &v in &component {
                in_scc[v] = true;
                blocked[v] = false;
                blocked_by[v].clear();
            }
            let mut search = CircuitSearch {
                graph: self,
                start,
                in_scc: &in_scc,
                blocked: &mut blocked,
                blocked_by: &mut blocked_by,
                path: &mut path,
                cycles: &mut cycles,
                limit,
            };
            search.circuit(start);
            for &v in &component {
                in_scc[v] = false;
            }
        }

        cycles
    }

    /// Simple cycles with at most `max_len` nodes, at most `limit` of them.
    ///
    /// Bounded depth-first search from every node, only through higher ids,
    /// so each cycle is found once, rooted at its lowest node.
    pub fn cycles_up_to(&self, max_len: usize, limit: usize) -> Vec<Vec<NodeId>> {
        let mut cycles = Vec::new();
        let mut on_path = vec![false; self.node_count()];

        for start in 0..self.node_count() {
            if cycles.len() >= limit {
                break;
            }
            let mut path = vec![start];
            on_path[start] = true;
            self.bounded_search(start, start, max_len, limit, &mut path, &mut on_path, &mut cycles);
            on_path[start] = false;
        }

        cycles
    }

    #[allow(clippy::too_many_arguments)]
    fn bounded_search(
        &self,
        start: NodeId,
        v: NodeId,
        max_len: usize,
        limit: usize,
        path: &mut Vec<NodeId>,
        on_path: &mut [bool],
        cycles: &mut Vec<Vec<NodeId>>,
    ) {
        for &w in &self.succ[v] {
            if cycles.len() >= limit {
                return;
            }
            if w == start {
                cycles.push(path.clone());
            } else if w > start && !on_path[w] && path.len() < max_len {
                path.push(w);
                on_path[w] = true;
                self.bounded_search(start, w, max_len, limit, path, on_path, cycles);
                on_path[w] = false;
                path.pop();
            }
        }
    }

    /// Serializable view; nodes and edges in insertion order
    pub fn to_flat(&self) -> FlatGraph {
        FlatGraph {
            nodes: (0..self.node_count())
                .map(|id| FlatNode {
                    id: self.keys[id].clone(),
                    label: self.labels[id].clone(),
                    in_degree: self.in_degree(id),
                    out_degree: self.out_degree(id),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|&(from, to)| FlatEdge {
                    source: self.keys[from].clone(),
                    target: self.keys[to].clone(),
                })
                .collect(),
        }
    }
}

/// State of one Johnson circuit search rooted at `start`
struct CircuitSearch<'a> {
    graph: &'a DiGraph,
    start: NodeId,
    in_scc: &'a [bool],
    blocked: &'a mut [bool],
    blocked_by: &'a mut [Vec<NodeId>],
    path: &'a mut Vec<NodeId>,
    cycles: &'a mut Vec<Vec<NodeId>>,
    limit: usize,
}

impl CircuitSearch<'_> {
    fn circuit(&mut self, v: NodeId) -> bool {
        let graph = self.graph;
        let mut found = false;
        self.path.push(v);
        self.blocked[v] = true;

        for &w in graph.successors(v) {
            if !self.in_scc[w] {
                continue;
            }
            if self.cycles.len() >= self.limit {
                break;
            }
            if w == self.start {
                self.cycles.push(self.path.clone());
                found = true;
            } else if !self.blocked[w] && self.circuit(w) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for &w in graph.successors(v) {
                if self.in_scc[w] && !self.blocked_by[w].contains(&v) {
                    self.blocked_by[w].push(v);
                }
            }
        }

        self.path.pop();
        found
    }

    fn unblock(&mut self, v: NodeId) {
        self.blocked[v] = false;
        let waiting = std::mem::take(&mut self.blocked_by[v]);
        for w in waiting {
            if self.blocked[w] {
                self.unblock(w);
            }
        }
    }
}
