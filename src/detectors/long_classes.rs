//! Long class detector

use crate::detectors::base::{Detector, FileContext};
use crate::models::{Smell, SmellKind};

use super::length_severity;

/// Classes whose line count exceeds `max_class_length`
pub struct LongClassDetector;

impl Detector for LongClassDetector {
    fn name(&self) -> &'static str {
        "long-class"
    }

    fn description(&self) -> &'static str {
        "Detects classes longer than the configured line limit"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        let limit = ctx.thresholds.max_class_length;
        ctx.unit
            .classes
            .iter()
            .filter(|c| c.line_count > limit)
            .map(|c| Smell {
                line: c.line_start,
                severity: length_severity(c.line_count, limit),
                kind: SmellKind::LongClass {
                    name: c.name.clone(),
                    lines: c.line_count,
                    methods: c.methods.len(),
                },
            })
            .collect()
    }
}
