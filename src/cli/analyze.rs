//! Analyze command - run the full pipeline and report

use crate::config::AnalysisConfig;
use crate::loader;
use crate::pipeline::Pipeline;
use crate::reporters;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

pub fn run(
    path: &Path,
    config: &AnalysisConfig,
    workers: Option<usize>,
    format: &str,
    output_path: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let files = loader::load_local(path, &config.loader)?;
    if files.is_empty() {
        warn!("No Python files found in {}", path.display());
    }
    info!("Found {} Python files", files.len());

    let report = Pipeline::new(config.clone())
        .with_workers(workers)
        .analyze(&files)?
        .with_metadata(path.display().to_string(), start.elapsed());
    let output = reporters::report(&report, format)?;

    match output_path {
        Some(out_path) => {
            std::fs::write(out_path, &output)
                .with_context(|| format!("Failed to write report to {}", out_path.display()))?;
            // stderr keeps stdout clean for piping
            eprintln!(
                "{} Report written to: {}",
                style("✓").green(),
                style(out_path.display()).cyan()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}
