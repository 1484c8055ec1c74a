//! Text (terminal) reporter with colors and formatting

use crate::metrics::Rank;
use crate::models::SmellSummary;
use crate::pipeline::AnalysisReport;
use anyhow::Result;
use console::style;
use std::fmt::Write;

const RULE: &str = "──────────────────────────────────────";

fn complexity_status(complexity: f64) -> String {
    if complexity <= 5.0 {
        style("good").green().to_string()
    } else if complexity <= 10.0 {
        style("moderate").yellow().to_string()
    } else {
        style("high").red().to_string()
    }
}

fn maintainability_status(score: f64) -> String {
    let rank = Rank::from_score(score);
    let label = format!("({}) {}", rank, rank.description());
    match rank {
        Rank::A => style(label).green().to_string(),
        Rank::B => style(label).yellow().to_string(),
        Rank::C => style(label).red().to_string(),
    }
}

fn severity_breakdown(summary: &SmellSummary) -> String {
    let mut parts = Vec::new();
    if summary.critical > 0 {
        parts.push(style(format!("{} critical", summary.critical)).red().bold().to_string());
    }
    if summary.high > 0 {
        parts.push(style(format!("{} high", summary.high)).red().to_string());
    }
    if summary.medium > 0 {
        parts.push(style(format!("{} medium", summary.medium)).yellow().to_string());
    }
    if summary.low > 0 {
        parts.push(style(format!("{} low", summary.low)).blue().to_string());
    }
    parts.join(" | ")
}

/// File name of a relative path
fn short_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Render report as a short terminal summary
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    let s = &report.summary;

    writeln!(out, "\n{}", style("Archaeologist Analysis").bold())?;
    writeln!(out, "{}", style(RULE).dim())?;
    write!(
        out,
        "Files: {}  Functions: {}  Classes: {}  LOC: {}",
        s.total_files, s.total_functions, s.total_classes, s.total_lines_of_code
    )?;
    if s.failed_files > 0 {
        write!(out, "  {}", style(format!("({} failed to parse)", s.failed_files)).red())?;
    }
    out.push_str("\n\n");

    writeln!(out, "{}", style("QUALITY").bold())?;
    writeln!(
        out,
        "  Avg complexity:   {:>8.2}  {}",
        s.average_complexity,
        complexity_status(s.average_complexity)
    )?;
    writeln!(
        out,
        "  Maintainability:  {:>8.2}  {}",
        s.average_maintainability,
        maintainability_status(s.average_maintainability)
    )?;
    writeln!(out, "  Code smells:      {:>8}  {}", s.total_code_smells, severity_breakdown(&s.smells_by_severity))?;
    for (kind, count) in &s.smells_by_type {
        writeln!(out, "    {:<22}{:>6}", style(kind).dim(), count)?;
    }
    out.push('\n');

    if !s.most_complex_files.is_empty() {
        writeln!(out, "{}", style("MOST COMPLEX FILES").bold())?;
        for (i, file) in s.most_complex_files.iter().enumerate() {
            writeln!(
                out,
                "  {:>2}. {:<40} avg={:.1} max={}",
                i + 1,
                short_name(&file.file),
                file.average_complexity,
                file.max_complexity
            )?;
        }
        out.push('\n');
    }

    let deps = &s.dependency_analysis;
    writeln!(out, "{}", style("STRUCTURE").bold())?;
    let cycles = if deps.has_circular_dependencies {
        style(format!("{} circular", deps.circular_dependencies)).red().to_string()
    } else {
        style("no cycles".to_string()).green().to_string()
    };
    writeln!(
        out,
        "  Dependencies:  {} edges, {}, {} isolated files",
        report.dependencies.graph.edges.len(),
        cycles,
        deps.isolated_files
    )?;
    let calls = &report.call_graph.analysis;
    writeln!(
        out,
        "  Call graph:    {} functions, {} calls, {} recursive",
        calls.total_functions, calls.total_calls, s.recursive_functions
    )?;
    writeln!(out, "  Duplicates:    {} signature clusters", s.duplicate_clusters)?;

    Ok(out)
}
