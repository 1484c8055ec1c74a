//! Detector engine
//!
//! Holds the registered per-file detectors and runs them. Files are
//! processed in parallel with rayon; results come back in input order and,
//! within a file, in detector registration order.

use crate::detectors::base::{Detector, FileContext};
use crate::detectors::{
    DeadCodeDetector, GlobalVariablesDetector, LongClassDetector, LongFunctionDetector,
    LongParameterListDetector, MagicNumbersDetector, MissingDocstringDetector,
};
use crate::models::Smell;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub struct DetectorEngine {
    detectors: Vec<Arc<dyn Detector>>,
}

impl DetectorEngine {
    /// Engine with no detectors
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Engine with every built-in detector, in report order
    pub fn with_default_detectors() -> Self {
        let mut engine = Self::new();
        engine.register_all(default_detectors());
        engine
    }

    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        debug!("Registered detector: {}", detector.name());
        self.detectors.push(detector);
    }

    pub fn register_all(&mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) {
        for detector in detectors {
            self.register(detector);
        }
    }

    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector over one file
    pub fn run(&self, ctx: &FileContext) -> Vec<Smell> {
        self.detectors.iter().flat_map(|d| d.detect(ctx)).collect()
    }

    /// Run every detector over many files in parallel, preserving order
    pub fn run_all(&self, contexts: &[FileContext]) -> Vec<Vec<Smell>> {
        contexts.par_iter().map(|ctx| self.run(ctx)).collect()
    }
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::with_default_detectors()
    }
}

/// The built-in detectors
pub fn default_detectors() -> Vec<Arc<dyn Detector>> {
    vec![
        Arc::new(LongFunctionDetector),
        Arc::new(LongClassDetector),
        Arc::new(MissingDocstringDetector),
        Arc::new(LongParameterListDetector),
        Arc::new(DeadCodeDetector),
        Arc::new(MagicNumbersDetector),
        Arc::new(GlobalVariablesDetector),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::models::{Severity, SmellKind, StructuralUnit};

    struct MockDetector;

    impl Detector for MockDetector {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn description(&self) -> &'static str {
            "One info smell per file"
        }

        fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
            vec![Smell {
                line: 1,
                severity: Severity::Info,
                kind: SmellKind::DeadCode {
                    name: ctx.unit.path.clone(),
                },
            }]
        }
    }

    #[test]
    fn test_default_detectors_registered() {
        let engine = DetectorEngine::default();
        assert_eq!(engine.detector_count(), 7);
        assert_eq!(engine.detector_names()[0], "long-function");
        assert_eq!(engine.detector_names()[6], "global-variables");
    }

    #[test]
    fn test_run_all_preserves_file_order() {
        let mut engine = DetectorEngine::new();
        engine.register(Arc::new(MockDetector));

        let units: Vec<StructuralUnit> = (0..20).map(|i| StructuralUnit::empty(format!("f{i}.py"))).collect();
        let thresholds = Thresholds::default();
        let contexts: Vec<FileContext> = units.iter().map(|u| FileContext::new(u, "", &thresholds)).collect();

        let results = engine.run_all(&contexts);
        assert_eq!(results.len(), 20);
        for (i, smells) in results.iter().enumerate() {
            assert_eq!(smells[0].kind, SmellKind::DeadCode { name: format!("f{i}.py") });
        }
    }

    #[test]
    fn test_smells_grouped_by_detector_order() {
        let source = "counter = 0\n\ndef f(a, b, c, d, e, g):\n    return 42\n";
        let unit = crate::parsers::python::parse_source(source, "m.py").unwrap();
        let thresholds = Thresholds::default();
        let smells = DetectorEngine::default().run(&FileContext::new(&unit, source, &thresholds));

        let labels: Vec<&str> = smells.iter().map(|s| s.kind.label()).collect();
        assert_eq!(
            labels,
            vec![
                "missing_docstring",
                "too_many_parameters",
                "dead_code",
                "magic_number",
                "non_constant_global"
            ]
        );
    }
}
