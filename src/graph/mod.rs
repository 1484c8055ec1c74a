//! Repository graphs
//!
//! An owned directed graph plus the two views built on it: file
//! dependencies from imports and the function call graph.

pub mod call_graph;
pub mod dependency;
pub mod digraph;

pub use call_graph::{CallGraph, CallGraphAnalysis, CallSite, FunctionDefinition, Resolution};
pub use dependency::DependencyAnalysis;
pub use digraph::{DiGraph, FlatEdge, FlatGraph, FlatNode, NodeId};
