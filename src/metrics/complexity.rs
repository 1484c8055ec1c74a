//! Cyclomatic complexity over the Python syntax tree

use tree_sitter::Node;

/// Node kinds that add one independent path
fn is_decision_point(kind: &str) -> bool {
    matches!(
        kind,
        "if_statement"
            | "elif_clause"
            | "conditional_expression"
            | "for_statement"
            | "while_statement"
            | "for_in_clause"
            | "if_clause"
            | "boolean_operator"
            | "except_clause"
            | "case_clause"
    )
}

/// Definitions whose bodies belong to someone else
fn is_nested_definition(kind: &str) -> bool {
    matches!(
        kind,
        "function_definition" | "class_definition" | "decorated_definition"
    )
}

/// Cyclomatic complexity of a function: 1 + decision points in its body.
///
/// Nested function and class definitions are skipped; they are scored on
/// their own.
pub fn cyclomatic(func: Node) -> u32 {
    let mut complexity = 1;
    let mut stack = Vec::new();
    let mut cursor = func.walk();
    stack.extend(func.children(&mut cursor));

    while let Some(node) = stack.pop() {
        let kind = node.kind();
        if is_nested_definition(kind) {
            continue;
        }
        if is_decision_point(kind) {
            complexity += 1;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }

    complexity
}

/// Every decision point under `root`, nested definitions included
pub fn decision_points(root: Node) -> u32 {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if is_decision_point(node.kind()) {
            count += 1;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    count
}
