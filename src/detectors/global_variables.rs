//! Global Variables Detector
//!
//! Module-level names that are not constants by convention.

use crate::detectors::base::{Detector, FileContext};
use crate::models::{Severity, Smell, SmellKind};

/// All cased characters uppercase, and at least one cased character
fn is_constant_name(name: &str) -> bool {
    let mut cased = false;
    for c in name.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

pub struct GlobalVariablesDetector;

impl Detector for GlobalVariablesDetector {
    fn name(&self) -> &'static str {
        "global-variables"
    }

    fn description(&self) -> &'static str {
        "Detects mutable global variables"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        ctx.unit
            .globals
            .iter()
            .filter(|g| !is_constant_name(&g.name) && !is_dunder(&g.name))
            .map(|g| Smell {
                line: g.line,
                severity: Severity::Low,
                kind: SmellKind::NonConstantGlobal {
                    name: g.name.clone(),
                },
            })
            .collect()
    }
}
