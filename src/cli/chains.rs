//! Chains command - print call chains from one function

use crate::config::AnalysisConfig;
use crate::graph::CallGraph;
use crate::loader;
use crate::models::StructuralUnit;
use crate::pipeline::Pipeline;
use anyhow::{bail, Result};
use console::style;
use std::path::Path;

pub fn run(
    path: &Path,
    config: &AnalysisConfig,
    workers: Option<usize>,
    function_id: &str,
    depth: usize,
) -> Result<()> {
    let files = loader::load_local(path, &config.loader)?;
    let units: Vec<StructuralUnit> = Pipeline::new(config.clone())
        .with_workers(workers)
        .extract(&files)?
        .into_iter()
        .map(|analysis| analysis.unit)
        .collect();
    let call_graph = CallGraph::build(&units);

    if call_graph.graph().node(function_id).is_none() {
        bail!(
            "Unknown function '{}'. Ids look like `pkg/mod.py::name` or `pkg/mod.py::Class.method`",
            function_id
        );
    }

    let chains = call_graph.call_chains(function_id, depth);
    println!(
        "\n{} call chains from {} (depth {})\n",
        style(chains.len()).cyan(),
        style(function_id).bold(),
        depth
    );
    for (i, chain) in chains.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, chain.join(&style(" -> ").dim().to_string()));
    }

    Ok(())
}
