//! Dead code detector - finds functions nobody calls
//!
//! A function is reported when its name never appears among the call names
//! collected from the file (or, in repository mode, from every analyzed
//! file). Matching is by bare name, so this is a hint, not proof.

use crate::detectors::base::{Detector, FileContext, Liveness};
use crate::models::{Severity, Smell, SmellKind, StructuralUnit};
use rustc_hash::FxHashSet;

/// Entry points that should not be flagged as dead code
static ENTRY_POINTS: &[&str] = &["main", "run", "execute"];

/// Union of call names across all files, for [`Liveness::Repository`]
pub fn repository_call_names(units: &[StructuralUnit]) -> FxHashSet<String> {
    units
        .iter()
        .flat_map(|u| u.functions.iter())
        .flat_map(|f| f.calls.iter().cloned())
        .collect()
}

pub struct DeadCodeDetector;

impl DeadCodeDetector {
    fn is_exempt(name: &str) -> bool {
        name.starts_with("__") || ENTRY_POINTS.contains(&name)
    }
}

impl Detector for DeadCodeDetector {
    fn name(&self) -> &'static str {
        "dead-code"
    }

    fn description(&self) -> &'static str {
        "Detects functions that are never called"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        let local_calls: FxHashSet<&str> = match ctx.liveness {
            Liveness::File => ctx
                .unit
                .functions
                .iter()
                .flat_map(|f| f.calls.iter().map(String::as_str))
                .collect(),
            Liveness::Repository(_) => FxHashSet::default(),
        };
        let is_called = |name: &str| match ctx.liveness {
            Liveness::Repository(calls) => calls.contains(name),
            Liveness::File => local_calls.contains(name),
        };

        let mut reported = FxHashSet::default();
        let mut smells = Vec::new();
        for func in &ctx.unit.functions {
            let name = func.name.as_str();
            if Self::is_exempt(name) || is_called(name) || !reported.insert(name) {
                continue;
            }
            smells.push(Smell {
                line: func.line_start,
                severity: Severity::Low,
                kind: SmellKind::DeadCode {
                    name: name.to_string(),
                },
            });
        }
        smells
    }
}
