//! Long parameter list detector
//!
//! Counts named parameters, ignoring the implicit receiver (`self`/`cls`)
//! and variadic catch-alls.

use crate::detectors::base::{Detector, FileContext};
use crate::models::{Severity, Smell, SmellKind};

/// Parameters to exclude from counting
static SKIP_PARAMS: &[&str] = &["self", "cls"];

/// Detects functions with too many parameters
pub struct LongParameterListDetector;

impl LongParameterListDetector {
    /// Parameter names that count toward the limit
    fn meaningful_params(params: &[String]) -> Vec<String> {
        params
            .iter()
            .filter(|p| !SKIP_PARAMS.contains(&p.as_str()))
            .cloned()
            .collect()
    }
}

impl Detector for LongParameterListDetector {
    fn name(&self) -> &'static str {
        "long-parameter-list"
    }

    fn description(&self) -> &'static str {
        "Detects functions with too many parameters"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        let max = ctx.thresholds.max_parameters;
        ctx.unit
            .functions
            .iter()
            .filter_map(|f| {
                let params = Self::meaningful_params(&f.parameters);
                (params.len() > max).then(|| Smell {
                    line: f.line_start,
                    severity: Severity::Medium,
                    kind: SmellKind::TooManyParameters {
                        name: f.name.clone(),
                        count: params.len(),
                        parameters: params,
                    },
                })
            })
            .collect()
    }
}
