//! Long function detector

use crate::detectors::base::{Detector, FileContext};
use crate::models::{Smell, SmellKind};

use super::length_severity;

/// Functions whose line count exceeds `max_function_length`
pub struct LongFunctionDetector;

impl Detector for LongFunctionDetector {
    fn name(&self) -> &'static str {
        "long-function"
    }

    fn description(&self) -> &'static str {
        "Detects functions longer than the configured line limit"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        let limit = ctx.thresholds.max_function_length;
        ctx.unit
            .functions
            .iter()
            .filter(|f| f.line_count > limit)
            .map(|f| Smell {
                line: f.line_start,
                severity: length_severity(f.line_count, limit),
                kind: SmellKind::LongFunction {
                    name: f.name.clone(),
                    lines: f.line_count,
                },
            })
            .collect()
    }
}
