//! JSON reporter
//!
//! Outputs the full AnalysisReport as pretty-printed JSON.

use crate::pipeline::AnalysisReport;
use anyhow::Result;

pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
