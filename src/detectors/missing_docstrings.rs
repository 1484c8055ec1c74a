//! Missing docstring detector

use crate::detectors::base::{Detector, FileContext};
use crate::models::{EntityKind, Severity, Smell, SmellKind};

/// Functions, then classes, without a docstring
pub struct MissingDocstringDetector;

impl Detector for MissingDocstringDetector {
    fn name(&self) -> &'static str {
        "missing-docstring"
    }

    fn description(&self) -> &'static str {
        "Detects functions and classes without docstrings"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        let functions = ctx
            .unit
            .functions
            .iter()
            .filter(|f| f.docstring.is_none())
            .map(|f| (f.name.as_str(), f.line_start, EntityKind::Function));
        let classes = ctx
            .unit
            .classes
            .iter()
            .filter(|c| c.docstring.is_none())
            .map(|c| (c.name.as_str(), c.line_start, EntityKind::Class));

        functions
            .chain(classes)
            .map(|(name, line, entity)| Smell {
                line,
                severity: Severity::Low,
                kind: SmellKind::MissingDocstring {
                    name: name.to_string(),
                    entity,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::parsers::python::parse_source;

    #[test]
    fn test_missing_docstrings() {
        let source = r#"
class Documented:
    """Has one."""

    def bare(self):
        return 1

class Bare:
    def documented(self):
        """Has one."""

def empty():
    """"""
"#;
        let unit = parse_source(source, "m.py").unwrap();
        let thresholds = Thresholds::default();
        let smells = MissingDocstringDetector.detect(&FileContext::new(&unit, source, &thresholds));

        let found: Vec<(String, EntityKind)> = smells
            .iter()
            .map(|s| match &s.kind {
                SmellKind::MissingDocstring { name, entity } => (name.clone(), *entity),
                other => panic!("unexpected smell {other:?}"),
            })
            .collect();
        assert_eq!(
            found,
            vec![
                ("bare".to_string(), EntityKind::Function),
                ("empty".to_string(), EntityKind::Function),
                ("Bare".to_string(), EntityKind::Class),
            ]
        );
        assert!(smells.iter().all(|s| s.severity == Severity::Low));
    }
}
