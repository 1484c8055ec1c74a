//! Output reporters for analysis results
//!
//! Supports two output formats:
//! - `text` - Short terminal summary with colors
//! - `json` - The full report, machine-readable

mod json;
mod text;

use crate::pipeline::AnalysisReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render an analysis report in the specified format
pub fn report(report: &AnalysisReport, format: &str) -> Result<String> {
    report_with_format(report, OutputFormat::from_str(format)?)
}

pub fn report_with_format(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::models::SourceFile;
    use crate::pipeline::Pipeline;

    /// A small report over two files, one with smells and a cycle
    pub(crate) fn test_report() -> AnalysisReport {
        let files = vec![
            SourceFile::from_content(
                "shop/cart.py",
                "import shop.pricing\n\ncounter = 0\n\ndef total(items, tax, discount, shipping, coupon, currency):\n    return 1500\n",
            ),
            SourceFile::from_content(
                "shop/pricing.py",
                "import shop.cart\n\ndef price(item):\n    \"\"\"Price of one item.\"\"\"\n    return price(item)\n",
            ),
        ];
        Pipeline::new(AnalysisConfig::default())
            .analyze(&files)
            .expect("analysis of fixture files")
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
