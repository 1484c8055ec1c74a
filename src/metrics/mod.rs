//! Metrics engine
//!
//! Per-function cyclomatic complexity is computed during extraction; this
//! module derives the per-file figures (complexity summary, maintainability
//! index, Halstead, raw lines, structure, documentation) and the repository
//! aggregates in [`repository`].

pub mod complexity;
pub mod halstead;
pub mod maintainability;
pub mod raw;
pub mod repository;

pub use halstead::HalsteadMetrics;
pub use maintainability::{Maintainability, Rank};
pub use raw::RawMetrics;
pub use repository::{RepositoryMetrics, TOP_COMPLEX_FILES};

use crate::models::{FunctionRecord, StructuralUnit};
use serde::{Deserialize, Serialize};
use tree_sitter::Tree;

/// Round to two decimals for reporting
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Complexity of one function, as listed in the file summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionComplexity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub line: u32,
    pub complexity: u32,
}

impl From<&FunctionRecord> for FunctionComplexity {
    fn from(func: &FunctionRecord) -> Self {
        Self {
            name: func.name.clone(),
            class_name: func.class_name.clone(),
            line: func.line_start,
            complexity: func.complexity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub average: f64,
    pub max: u32,
    pub functions: Vec<FunctionComplexity>,
    pub high_complexity_count: usize,
    pub high_complexity_functions: Vec<FunctionComplexity>,
}

impl ComplexityMetrics {
    pub fn from_functions(functions: &[FunctionRecord], max_complexity: u32) -> Self {
        if functions.is_empty() {
            return Self::default();
        }
        let total: u32 = functions.iter().map(|f| f.complexity).sum();
        let listed: Vec<FunctionComplexity> = functions.iter().map(FunctionComplexity::from).collect();
        let high: Vec<FunctionComplexity> = listed
            .iter()
            .filter(|f| f.complexity > max_complexity)
            .cloned()
            .collect();

        Self {
            average: round2(total as f64 / functions.len() as f64),
            max: functions.iter().map(|f| f.complexity).max().unwrap_or(0),
            functions: listed,
            high_complexity_count: high.len(),
            high_complexity_functions: high,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMetrics {
    pub functions: usize,
    pub classes: usize,
    pub imports: usize,
    pub average_function_length: f64,
    pub average_class_length: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentationMetrics {
    /// Percentage of functions and classes with a docstring
    pub coverage: f64,
    pub functions_with_docs: usize,
    pub classes_with_docs: usize,
}

/// Everything that needs a parsed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub complexity: ComplexityMetrics,
    pub maintainability: Maintainability,
    pub halstead: HalsteadMetrics,
    pub structure: StructureMetrics,
    pub documentation: DocumentationMetrics,
}

/// Metrics for one file. Files that failed to parse only get `raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub raw: RawMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeMetrics>,
}

impl FileMetrics {
    /// Line metrics only, for files without a syntax tree
    pub fn raw_only(source: &str) -> Self {
        Self {
            raw: raw::analyze(source),
            code: None,
        }
    }

    pub fn compute(unit: &StructuralUnit, tree: &Tree, source: &str, max_complexity: u32) -> Self {
        let raw = raw::analyze(source);
        let root = tree.root_node();

        let halstead = halstead::calculate(root, source);
        let total_complexity = complexity::decision_points(root) + unit.functions.len() as u32;
        let comment_percent = if raw.sloc > 0 {
            raw.comments as f64 / raw.sloc as f64 * 100.0
        } else {
            0.0
        };
        let score = maintainability::index(halstead.volume, total_complexity, raw.sloc, comment_percent);

        let code = CodeMetrics {
            complexity: ComplexityMetrics::from_functions(&unit.functions, max_complexity),
            maintainability: Maintainability::new(round2(score)),
            halstead,
            structure: structure(unit),
            documentation: documentation(unit),
        };

        Self {
            raw,
            code: Some(code),
        }
    }

    pub fn average_complexity(&self) -> f64 {
        self.code.as_ref().map_or(0.0, |c| c.complexity.average)
    }

    pub fn maintainability_score(&self) -> f64 {
        self.code.as_ref().map_or(0.0, |c| c.maintainability.score)
    }
}

fn average_length(lengths: impl ExactSizeIterator<Item = u32>) -> f64 {
    let count = lengths.len();
    if count == 0 {
        return 0.0;
    }
    let total: u64 = lengths.map(u64::from).sum();
    round2(total as f64 / count as f64)
}

fn structure(unit: &StructuralUnit) -> StructureMetrics {
    StructureMetrics {
        functions: unit.functions.len(),
        classes: unit.classes.len(),
        imports: unit.imports.len(),
        average_function_length: average_length(unit.functions.iter().map(|f| f.line_count)),
        average_class_length: average_length(unit.classes.iter().map(|c| c.line_count)),
    }
}

fn documentation(unit: &StructuralUnit) -> DocumentationMetrics {
    let functions_with_docs = unit.functions.iter().filter(|f| f.docstring.is_some()).count();
    let classes_with_docs = unit.classes.iter().filter(|c| c.docstring.is_some()).count();
    let total = unit.functions.len() + unit.classes.len();

    let coverage = if total == 0 {
        0.0
    } else {
        round2((functions_with_docs + classes_with_docs) as f64 / total as f64 * 100.0)
    };

    DocumentationMetrics {
        coverage,
        functions_with_docs,
        classes_with_docs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::python::{extract_tree, parse_tree};

    fn metrics(source: &str, max_complexity: u32) -> FileMetrics {
        let tree = parse_tree(source, "m.py").expect("should parse");
        let unit = extract_tree(&tree, source, "m.py");
        FileMetrics::compute(&unit, &tree, source, max_complexity)
    }

    const SAMPLE: &str = r#"import math

def calculate_area(radius):
    '''Calculate the area of a circle'''
    return math.pi * radius ** 2

def classify(x):
    if x > 0 and x < 10:
        return "small"
    return "other"

class Calculator:
    '''Simple calculator'''

    def add(self, a, b):
        return a + b
"#;

    #[test]
    fn test_complexity_summary() {
        let m = metrics(SAMPLE, 2);
        let code = m.code.expect("parsed file has code metrics");
        // 1, 3, 1
        assert_eq!(code.complexity.max, 3);
        assert_eq!(code.complexity.average, 1.67);
        assert_eq!(code.complexity.high_complexity_count, 1);
        assert_eq!(code.complexity.high_complexity_functions[0].name, "classify");
        assert_eq!(code.complexity.functions[2].class_name.as_deref(), Some("Calculator"));
    }

    #[test]
    fn test_structure_and_documentation() {
        let code = metrics(SAMPLE, 10).code.expect("code metrics");
        assert_eq!(code.structure.functions, 3);
        assert_eq!(code.structure.classes, 1);
        assert_eq!(code.structure.imports, 1);
        assert_eq!(code.documentation.functions_with_docs, 1);
        assert_eq!(code.documentation.classes_with_docs, 1);
        assert_eq!(code.documentation.coverage, 50.0);
    }

    #[test]
    fn test_maintainability_in_range() {
        let code = metrics(SAMPLE, 10).code.expect("code metrics");
        let score = code.maintainability.score;
        assert!(score > 0.0 && score <= 100.0);
        assert_eq!(code.maintainability.rank, Rank::from_score(score));
        assert!(code.halstead.volume > 0.0);
    }

    #[test]
    fn test_file_without_functions() {
        let code = metrics("X = 1\n", 10).code.expect("code metrics");
        assert_eq!(code.complexity, ComplexityMetrics::default());
        assert_eq!(code.documentation.coverage, 0.0);
        // no operators at all
        assert_eq!(code.maintainability.score, 100.0);
    }

    #[test]
    fn test_raw_only() {
        let m = FileMetrics::raw_only("def broken(:\n");
        assert!(m.code.is_none());
        assert_eq!(m.raw.loc, 1);
        assert_eq!(m.average_complexity(), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.666_666), 1.67);
        assert_eq!(round2(2.0), 2.0);
    }
}
