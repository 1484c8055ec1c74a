//! Raw line metrics
//!
//! One pass over the lines with a single "inside a multi-line string" flag.
//! String lines count as comments, which is how the maintainability index
//! expects them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Total lines
    pub loc: usize,
    /// Source lines (not blank, not comment)
    pub sloc: usize,
    /// Comment lines, multi-line string lines included
    pub comments: usize,
    pub blank: usize,
    /// Comment lines as a percentage of total lines
    pub comment_ratio: f64,
    /// Source lines as a percentage of total lines
    pub code_ratio: f64,
}

/// Number of `"""` and `'''` delimiters on a line
fn triple_quotes(line: &str) -> usize {
    line.matches("\"\"\"").count() + line.matches("'''").count()
}

pub fn analyze(content: &str) -> RawMetrics {
    let mut metrics = RawMetrics::default();
    let mut in_string = false;

    for line in content.lines() {
        metrics.loc += 1;
        let stripped = line.trim();

        let delimiters = triple_quotes(stripped);
        if delimiters > 0 {
            if delimiters % 2 == 1 {
                in_string = !in_string;
            }
            metrics.comments += 1;
        } else if in_string || stripped.starts_with('#') {
            metrics.comments += 1;
        } else if stripped.is_empty() {
            metrics.blank += 1;
        } else {
            metrics.sloc += 1;
        }
    }

    if metrics.loc > 0 {
        metrics.comment_ratio = super::round2(metrics.comments as f64 / metrics.loc as f64 * 100.0);
        metrics.code_ratio = super::round2(metrics.sloc as f64 / metrics.loc as f64 * 100.0);
    }
    metrics
}
