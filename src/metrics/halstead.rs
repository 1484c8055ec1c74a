//! Halstead software science metrics
//!
//! Operators and operands come from expression nodes only: binary, unary,
//! boolean, comparison and augmented assignment. Operands are identified by
//! their source text, operators by their token.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// Halstead counts and derived measures for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    /// Distinct operators
    pub h1: usize,
    /// Distinct operands
    pub h2: usize,
    /// Total operators
    pub n1: usize,
    /// Total operands
    pub n2: usize,
    pub vocabulary: usize,
    pub length: usize,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
}

#[derive(Default)]
struct HalsteadCounts {
    operators: FxHashSet<String>,
    operands: FxHashSet<String>,
    operator_total: usize,
    operand_total: usize,
}

impl HalsteadCounts {
    fn operator(&mut self, op: &str) {
        self.operators.insert(op.to_string());
        self.operator_total += 1;
    }

    fn operand(&mut self, node: Option<Node>, source: &[u8]) {
        let Some(node) = node else { return };
        let text = node.utf8_text(source).unwrap_or("");
        self.operands.insert(text.to_string());
        self.operand_total += 1;
    }

    fn process(&mut self, node: Node, source: &[u8]) {
        match node.kind() {
            "binary_operator" | "boolean_operator" | "augmented_assignment" => {
                if let Some(op) = node.child_by_field_name("operator") {
                    self.operator(op.kind());
                }
                self.operand(node.child_by_field_name("left"), source);
                self.operand(node.child_by_field_name("right"), source);
            }
            "unary_operator" => {
                if let Some(op) = node.child_by_field_name("operator") {
                    self.operator(op.kind());
                }
                self.operand(node.child_by_field_name("argument"), source);
            }
            "not_operator" => {
                self.operator("not");
                self.operand(node.child_by_field_name("argument"), source);
            }
            "comparison_operator" => {
                // `a < b <= c` has two operators and three operands
                let mut cursor = node.walk();
                let mut ops = Vec::new();
                for op in node.children_by_field_name("operators", &mut cursor) {
                    ops.push(op.utf8_text(source).unwrap_or(op.kind()).to_string());
                }
                for op in &ops {
                    self.operator(op);
                }
                let mut cursor = node.walk();
                let operands: Vec<Node> = node.named_children(&mut cursor).collect();
                for operand in operands {
                    self.operand(Some(operand), source);
                }
            }
            _ => {}
        }
    }

    fn into_metrics(self) -> HalsteadMetrics {
        compute(
            self.operators.len(),
            self.operands.len(),
            self.operator_total,
            self.operand_total,
        )
    }
}

/// Halstead metrics over every expression under `root`
pub fn calculate(root: Node, source: &str) -> HalsteadMetrics {
    let bytes = source.as_bytes();
    let mut counts = HalsteadCounts::default();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        counts.process(node, bytes);
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }

    counts.into_metrics()
}

/// Derived measures from raw counts
pub fn compute(h1: usize, h2: usize, n1: usize, n2: usize) -> HalsteadMetrics {
    let vocabulary = h1 + h2;
    let length = n1 + n2;
    let volume = if vocabulary > 0 {
        length as f64 * (vocabulary as f64).log2()
    } else {
        0.0
    };
    let difficulty = if h2 > 0 {
        (h1 as f64 / 2.0) * (n2 as f64 / h2 as f64)
    } else {
        0.0
    };

    HalsteadMetrics {
        h1,
        h2,
        n1,
        n2,
        vocabulary,
        length,
        volume,
        difficulty,
        effort: difficulty * volume,
    }
}
