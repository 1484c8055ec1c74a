//! Python parser using tree-sitter
//!
//! Extracts functions, classes, imports, and module-level assignments from
//! Python source code in a single walk of the syntax tree.

use crate::metrics::complexity;
use crate::models::{ClassRecord, FunctionRecord, GlobalVariable, ImportRecord, StructuralUnit};
use crate::parsers::ParseError;
use std::collections::HashSet;
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source and extract its structural unit
pub fn parse_source(source: &str, path: &str) -> Result<StructuralUnit, ParseError> {
    let tree = parse_tree(source, path)?;
    Ok(extract_tree(&tree, source, path))
}

/// Parse Python source into a syntax tree, rejecting trees with error nodes
pub fn parse_tree(source: &str, path: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| ParseError::new(path, 0, 0, format!("failed to load Python grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new(path, 0, 0, "parser produced no syntax tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(root, path));
    }
    if let Some(err) = legacy_statement(root, path) {
        return Err(err);
    }
    Ok(tree)
}

/// The grammar still accepts Python 2 `print`/`exec` statements; Python 3 does not
fn legacy_statement(root: Node, path: &str) -> Option<ParseError> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let message = match node.kind() {
            "print_statement" => Some("missing parentheses in call to 'print'"),
            "exec_statement" => Some("missing parentheses in call to 'exec'"),
            _ => None,
        };
        if let Some(message) = message {
            let pos = node.start_position();
            return Some(ParseError::new(path, pos.row as u32 + 1, pos.column as u32 + 1, message));
        }
        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return None;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// Walk an already-parsed tree and collect its structural records
pub fn extract_tree(tree: &Tree, source: &str, path: &str) -> StructuralUnit {
    let mut visitor = Visitor::new(source.as_bytes());
    visitor.walk_children(tree.root_node(), &Scope::Module);
    visitor.finish(path)
}

/// Locate the first error or missing node for the report
fn syntax_error(root: Node, path: &str) -> ParseError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return ParseError::new(path, pos.row as u32 + 1, pos.column as u32 + 1, message);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    let pos = root.start_position();
    ParseError::new(path, pos.row as u32 + 1, pos.column as u32 + 1, "invalid syntax")
}

/// Where the walk currently is; decides class membership of functions
enum Scope {
    Module,
    Class(String),
    Function,
}

/// Per-file accumulator. Owned by one extraction call, never shared.
struct Visitor<'a> {
    source: &'a [u8],
    functions: Vec<FunctionRecord>,
    classes: Vec<ClassRecord>,
    imports: Vec<ImportRecord>,
    globals: Vec<GlobalVariable>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            globals: Vec::new(),
        }
    }

    fn finish(self, path: &str) -> StructuralUnit {
        StructuralUnit {
            path: path.to_string(),
            functions: self.functions,
            classes: self.classes,
            imports: self.imports,
            globals: self.globals,
        }
    }

    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    fn walk_children(&mut self, node: Node, scope: &Scope) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        for child in children {
            self.walk(child, scope);
        }
    }

    fn walk(&mut self, node: Node, scope: &Scope) {
        match node.kind() {
            "function_definition" => self.visit_function(node, Vec::new(), scope),
            "class_definition" => self.visit_class(node, Vec::new(), scope),
            "decorated_definition" => {
                let decorators = self.decorators(node);
                match node.child_by_field_name("definition") {
                    Some(def) if def.kind() == "function_definition" => {
                        self.visit_function(def, decorators, scope)
                    }
                    Some(def) if def.kind() == "class_definition" => {
                        self.visit_class(def, decorators, scope)
                    }
                    _ => self.walk_children(node, scope),
                }
            }
            "import_statement" => self.visit_import(node),
            "import_from_statement" => self.visit_import_from(node),
            "future_import_statement" => self.visit_future_import(node),
            "expression_statement" => {
                if node.parent().is_some_and(|p| p.kind() == "module") {
                    self.visit_module_assignment(node);
                }
                self.walk_children(node, scope);
            }
            _ => self.walk_children(node, scope),
        }
    }

    fn visit_function(&mut self, node: Node, decorators: Vec<String>, scope: &Scope) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let (parameters, variadic, positional_count) = self.parameters(node.child_by_field_name("parameters"));
        let line_start = node.start_position().row as u32 + 1;
        let line_end = node.end_position().row as u32 + 1;
        let mut first = node.walk();
        let is_async = node.children(&mut first).next().is_some_and(|c| c.kind() == "async");

        self.functions.push(FunctionRecord {
            name: self.text(name_node),
            class_name: match scope {
                Scope::Class(name) => Some(name.clone()),
                _ => None,
            },
            parameters,
            variadic,
            positional_count,
            return_annotation: node.child_by_field_name("return_type").map(|n| self.text(n)),
            docstring: self.docstring(node.child_by_field_name("body")),
            line_start,
            line_end,
            decorators,
            is_async,
            calls: self.calls(node),
            complexity: complexity::cyclomatic(node),
            line_count: line_end - line_start + 1,
        });

        self.walk_children(node, &Scope::Function);
    }

    fn visit_class(&mut self, node: Node, decorators: Vec<String>, _scope: &Scope) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node);
        let body = node.child_by_field_name("body");
        let line_start = node.start_position().row as u32 + 1;
        let line_end = node.end_position().row as u32 + 1;

        self.classes.push(ClassRecord {
            name: name.clone(),
            bases: self.bases(node.child_by_field_name("superclasses")),
            docstring: self.docstring(body),
            methods: self.method_names(body),
            decorators,
            line_start,
            line_end,
            line_count: line_end - line_start + 1,
        });

        self.walk_children(node, &Scope::Class(name));
    }

    fn decorators(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|c| c.kind() == "decorator")
            .map(|d| self.text(d).trim_start_matches('@').trim().to_string())
            .collect()
    }

    /// Named parameters, variadic catch-alls, and the number of named
    /// parameters that are neither positional-only nor keyword-only
    fn parameters(&self, params: Option<Node>) -> (Vec<String>, Vec<String>, usize) {
        let mut named = Vec::new();
        let mut variadic = Vec::new();
        let Some(params) = params else {
            return (named, variadic, 0);
        };

        // everything before `/` is positional-only, everything after `*` keyword-only
        let mut positional = 0;
        let mut keyword_only = false;
        let mut cursor = params.walk();
        for child in params.named_children(&mut cursor) {
            let name = match child.kind() {
                "identifier" => Some(self.text(child)),
                "default_parameter" | "typed_default_parameter" => child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.text(n)),
                "typed_parameter" => {
                    let mut inner = child.walk();
                    let first = child.named_children(&mut inner).next();
                    match first {
                        Some(n) if n.kind() == "identifier" => Some(self.text(n)),
                        Some(n) => {
                            keyword_only |= n.kind() == "list_splat_pattern";
                            if let Some(v) = self.splat(n) {
                                variadic.push(v);
                            }
                            None
                        }
                        None => None,
                    }
                }
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    keyword_only |= child.kind() == "list_splat_pattern";
                    if let Some(v) = self.splat(child) {
                        variadic.push(v);
                    }
                    None
                }
                "positional_separator" => {
                    positional = 0;
                    None
                }
                "keyword_separator" => {
                    keyword_only = true;
                    None
                }
                _ => None,
            };
            if let Some(name) = name {
                if !keyword_only {
                    positional += 1;
                }
                named.push(name);
            }
        }
        (named, variadic, positional)
    }

    fn splat(&self, node: Node) -> Option<String> {
        let prefix = match node.kind() {
            "list_splat_pattern" => "*",
            "dictionary_splat_pattern" => "**",
            _ => return None,
        };
        let mut cursor = node.walk();
        let ident = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "identifier")?;
        Some(format!("{}{}", prefix, self.text(ident)))
    }

    fn bases(&self, superclasses: Option<Node>) -> Vec<String> {
        let Some(args) = superclasses else {
            return Vec::new();
        };
        let mut cursor = args.walk();
        args.named_children(&mut cursor)
            .filter(|arg| !matches!(arg.kind(), "keyword_argument" | "comment"))
            .map(|arg| self.text(arg))
            .collect()
    }

    /// Direct function members of a class body
    fn method_names(&self, body: Option<Node>) -> Vec<String> {
        let Some(body) = body else {
            return Vec::new();
        };
        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .filter_map(|child| match child.kind() {
                "function_definition" => Some(child),
                "decorated_definition" => child
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition"),
                _ => None,
            })
            .filter_map(|func| func.child_by_field_name("name"))
            .map(|n| self.text(n))
            .collect()
    }

    /// First statement of a body, if it is a plain string literal
    fn docstring(&self, body: Option<Node>) -> Option<String> {
        let body = body?;
        let mut cursor = body.walk();
        let first = body.named_children(&mut cursor).find(|n| n.kind() != "comment")?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let mut inner = first.walk();
        let expr = first.named_children(&mut inner).next()?;

        let value = match expr.kind() {
            "string" => string_value(&self.text(expr))?,
            "concatenated_string" => {
                let mut parts = expr.walk();
                let pieces: Option<Vec<String>> = expr
                    .named_children(&mut parts)
                    .filter(|p| p.kind() == "string")
                    .map(|p| string_value(&self.text(p)))
                    .collect();
                pieces?.concat()
            }
            _ => return None,
        };

        let cleaned = clean_docstring(&value);
        (!cleaned.is_empty()).then_some(cleaned)
    }

    /// Callee names inside a function, first-seen order, deduplicated
    fn calls(&self, func: Node) -> Vec<String> {
        let mut calls = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![func];

        while let Some(node) = stack.pop() {
            if node.kind() == "call" {
                if let Some(name) = node
                    .child_by_field_name("function")
                    .and_then(|target| self.call_name(target))
                {
                    if seen.insert(name.clone()) {
                        calls.push(name);
                    }
                }
            }
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        calls
    }

    /// `f()` -> `f`, `obj.attr.method()` -> `method`; other shapes are skipped
    fn call_name(&self, target: Node) -> Option<String> {
        match target.kind() {
            "identifier" => Some(self.text(target)),
            "attribute" => target.child_by_field_name("attribute").map(|a| self.text(a)),
            _ => None,
        }
    }

    fn visit_import(&mut self, node: Node) {
        let mut modules = Vec::new();
        let mut aliases = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            match child.kind() {
                "dotted_name" => modules.push(self.text(child)),
                "aliased_import" => {
                    let Some(module) = child.child_by_field_name("name").map(|n| self.text(n))
                    else {
                        continue;
                    };
                    if let Some(alias) = child.child_by_field_name("alias") {
                        aliases.push((module.clone(), self.text(alias)));
                    }
                    modules.push(module);
                }
                _ => {}
            }
        }
        self.imports.push(ImportRecord::Plain {
            modules,
            aliases,
            line: node.start_position().row as u32 + 1,
        });
    }

    fn visit_import_from(&mut self, node: Node) {
        let (module, level) = match node.child_by_field_name("module_name") {
            Some(m) if m.kind() == "relative_import" => {
                let mut cursor = m.walk();
                let mut level = 0;
                let mut module = None;
                for part in m.children(&mut cursor) {
                    match part.kind() {
                        "import_prefix" => {
                            level = self.text(part).chars().filter(|c| *c == '.').count() as u32
                        }
                        "dotted_name" => module = Some(self.text(part)),
                        _ => {}
                    }
                }
                (module, level)
            }
            Some(m) => (Some(self.text(m)), 0),
            None => (None, 0),
        };

        let names = self.imported_names(node);
        self.imports.push(ImportRecord::From {
            module,
            names,
            level,
            line: node.start_position().row as u32 + 1,
        });
    }

    fn visit_future_import(&mut self, node: Node) {
        let names = self.imported_names(node);
        self.imports.push(ImportRecord::From {
            module: Some("__future__".to_string()),
            names,
            level: 0,
            line: node.start_position().row as u32 + 1,
        });
    }

    fn imported_names(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        if node.children(&mut cursor).any(|c| c.kind() == "wildcard_import") {
            return vec!["*".to_string()];
        }
        let mut cursor = node.walk();
        node.children_by_field_name("name", &mut cursor)
            .filter_map(|n| match n.kind() {
                "aliased_import" => n.child_by_field_name("name").map(|x| self.text(x)),
                _ => Some(self.text(n)),
            })
            .collect()
    }

    /// `name = ...` directly under the module
    fn visit_module_assignment(&mut self, stmt: Node) {
        let mut cursor = stmt.walk();
        let Some(assignment) = stmt
            .named_children(&mut cursor)
            .next()
            .filter(|n| n.kind() == "assignment")
        else {
            return;
        };
        if let Some(target) = assignment.child_by_field_name("left") {
            if target.kind() == "identifier" {
                self.globals.push(GlobalVariable {
                    name: self.text(target),
                    line: stmt.start_position().row as u32 + 1,
                });
            }
        }
    }
}

/// Literal value of a string token, or `None` for f-strings and bytes
fn string_value(raw: &str) -> Option<String> {
    let prefix_len = raw.find(['"', '\'']).unwrap_or(0);
    let prefix = raw[..prefix_len].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let body = &raw[prefix_len..];
    let quote = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        3
    } else {
        1
    };
    if body.len() < quote * 2 {
        return Some(String::new());
    }
    Some(body[quote..body.len() - quote].to_string())
}

/// Normalize docstring indentation the way `inspect.cleandoc` does.
/// Margins are counted in characters, so non-ASCII whitespace is safe.
fn clean_docstring(doc: &str) -> String {
    let lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().count() - l.trim_start().chars().count())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start());
        } else {
            cleaned.push(strip_margin(line, margin).trim_end());
        }
    }

    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

/// Expand tabs to the next multiple of 8 columns
fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        match c {
            '\t' => {
                let pad = 8 - column % 8;
                out.push_str(&" ".repeat(pad));
                column += pad;
            }
            '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Drop the first `margin` characters; shorter lines become empty
fn strip_margin(line: &str, margin: usize) -> &str {
    match line.char_indices().nth(margin) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> StructuralUnit {
        parse_source(source, "test.py").expect("should parse")
    }

    #[test]
    fn test_parse_simple_function() {
        let source = r#"
def hello(name: str) -> str:
    """Greet someone."""
    return f"Hello, {name}!"
"#;
        let unit = parse(source);

        assert_eq!(unit.functions.len(), 1);
        let func = &unit.functions[0];
        assert_eq!(func.name, "hello");
        assert_eq!(func.parameters, vec!["name"]);
        assert_eq!(func.return_annotation.as_deref(), Some("str"));
        assert_eq!(func.docstring.as_deref(), Some("Greet someone."));
        assert!(!func.is_async);
        assert_eq!(func.line_start, 2);
        assert_eq!(func.line_end, 4);
        assert_eq!(func.line_count, 3);
        assert!(func.class_name.is_none());
    }

    #[test]
    fn test_parse_async_function() {
        let source = r#"
async def fetch_data(url: str) -> bytes:
    return await http.get(url)
"#;
        let unit = parse(source);
        let func = &unit.functions[0];
        assert_eq!(func.name, "fetch_data");
        assert!(func.is_async);
        assert_eq!(func.calls, vec!["get"]);
    }

    #[test]
    fn test_parse_class_and_methods() {
        let source = r#"
class MyClass(BaseClass, mixins.Mixin, metaclass=Meta):
    """A class."""

    def __init__(self):
        pass

    @property
    def value(self):
        return self._value
"#;
        let unit = parse(source);

        assert_eq!(unit.classes.len(), 1);
        let class = &unit.classes[0];
        assert_eq!(class.name, "MyClass");
        assert_eq!(class.bases, vec!["BaseClass", "mixins.Mixin"]);
        assert_eq!(class.methods, vec!["__init__", "value"]);
        assert_eq!(class.docstring.as_deref(), Some("A class."));

        assert_eq!(unit.functions.len(), 2);
        assert!(unit
            .functions
            .iter()
            .all(|f| f.class_name.as_deref() == Some("MyClass")));
        assert_eq!(unit.functions[1].decorators, vec!["property"]);
    }

    #[test]
    fn test_nested_functions_are_flat() {
        let source = r#"
class Processor:
    def process(self, items):
        def local_transform(val):
            return val.upper()
        helper = lambda x: x * 2
        return [local_transform(r) for r in items]
"#;
        let unit = parse(source);
        assert_eq!(unit.classes[0].methods, vec!["process"]);

        let names: Vec<&str> = unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["process", "local_transform"]);
        assert_eq!(unit.functions[0].class_name.as_deref(), Some("Processor"));
        assert!(unit.functions[1].class_name.is_none());
        // the enclosing function sees calls made by the nested one
        assert!(unit.functions[0].calls.contains(&"upper".to_string()));
        assert!(unit.functions[0].calls.contains(&"local_transform".to_string()));
    }

    #[test]
    fn test_parameters_and_variadics() {
        let source = r#"
def f(self, a, b: int, c=1, d: str = "x", *args, e, **kwargs):
    pass

def g(*, key, **opts: dict):
    pass
"#;
        let unit = parse(source);
        let f = &unit.functions[0];
        assert_eq!(f.parameters, vec!["self", "a", "b", "c", "d", "e"]);
        assert_eq!(f.variadic, vec!["*args", "**kwargs"]);
        assert_eq!(f.positional_count, 5);

        let g = &unit.functions[1];
        assert_eq!(g.parameters, vec!["key"]);
        assert_eq!(g.variadic, vec!["**opts"]);
        assert_eq!(g.positional_count, 0);
    }

    #[test]
    fn test_positional_count_skips_separated_parameters() {
        let unit = parse("def h(a, b, /, c, *, d):\n    pass\n\ndef k(x, *rest: int, y):\n    pass\n");
        assert_eq!(unit.functions[0].parameters, vec!["a", "b", "c", "d"]);
        assert_eq!(unit.functions[0].positional_count, 1);
        assert_eq!(unit.functions[1].positional_count, 1);
    }

    #[test]
    fn test_call_names_are_reduced_and_deduplicated() {
        let source = r#"
def caller(obj):
    some_function()
    some_function()
    obj.method()
    self.helper.method()
    pkg.module.run()
    handlers[0]()
    make()()
"#;
        let unit = parse(source);
        let calls = &unit.functions[0].calls;
        assert_eq!(calls, &vec!["some_function", "method", "run", "make"]);
    }

    #[test]
    fn test_parse_imports() {
        let source = r#"
import os
import numpy as np, pkg.sub
from pathlib import Path
from typing import List, Optional as Opt
from . import sibling
from ..core.models import *
from __future__ import annotations

def lazy():
    import json
"#;
        let unit = parse(source);
        assert_eq!(unit.imports.len(), 8);

        assert_eq!(
            unit.imports[1],
            ImportRecord::Plain {
                modules: vec!["numpy".into(), "pkg.sub".into()],
                aliases: vec![("numpy".into(), "np".into())],
                line: 3,
            }
        );
        assert_eq!(
            unit.imports[3],
            ImportRecord::From {
                module: Some("typing".into()),
                names: vec!["List".into(), "Optional".into()],
                level: 0,
                line: 5,
            }
        );
        assert_eq!(
            unit.imports[4],
            ImportRecord::From {
                module: None,
                names: vec!["sibling".into()],
                level: 1,
                line: 6,
            }
        );
        assert_eq!(
            unit.imports[5],
            ImportRecord::From {
                module: Some("core.models".into()),
                names: vec!["*".into()],
                level: 2,
                line: 7,
            }
        );
        assert!(matches!(
            &unit.imports[6],
            ImportRecord::From { module: Some(m), .. } if m == "__future__"
        ));
        // imports inside functions are still recorded
        assert!(matches!(
            &unit.imports[7],
            ImportRecord::Plain { modules, .. } if modules == &vec!["json".to_string()]
        ));
    }

    #[test]
    fn test_module_level_globals_only() {
        let source = r#"
MAX_SIZE = 10
counter = 0
a, b = 1, 2
counter += 1

def f():
    local = 5
    return local

if True:
    nested = 1
"#;
        let unit = parse(source);
        let names: Vec<&str> = unit.globals.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["MAX_SIZE", "counter"]);
        assert_eq!(unit.globals[1].line, 3);
    }

    #[test]
    fn test_docstring_cleaning() {
        let source = r#"
def documented():
    """
    Summary line.

        Indented detail.
    """
    return 1

def empty_doc():
    """"""
    return 2

def commented():
    # leading comment
    'single quoted doc'

def not_a_doc():
    x = "string later"
"#;
        let unit = parse(source);
        assert_eq!(
            unit.functions[0].docstring.as_deref(),
            Some("Summary line.\n\n    Indented detail.")
        );
        assert!(unit.functions[1].docstring.is_none());
        assert_eq!(unit.functions[2].docstring.as_deref(), Some("single quoted doc"));
        assert!(unit.functions[3].docstring.is_none());
    }

    #[test]
    fn test_docstring_with_non_ascii_indent() {
        let source = "def f():\n    \"\"\"Summary.\n    detail one\n   \u{a0}detail two\n    \"\"\"\n    return 1\n";
        let unit = parse(source);
        assert_eq!(
            unit.functions[0].docstring.as_deref(),
            Some("Summary.\ndetail one\ndetail two")
        );
    }

    #[test]
    fn test_clean_docstring_tab_stops() {
        assert_eq!(clean_docstring("Title.\n  \tbody\n\tmore"), "Title.\nbody\nmore");
        assert_eq!(clean_docstring("Title.\n\tx\ty"), "Title.\nx       y");
        assert_eq!(clean_docstring("Title.\n    a\n  \n    b"), "Title.\na\n\nb");
    }

    #[test]
    fn test_python2_statements_are_rejected() {
        let err = parse_source("import os\nprint \"hello\"\n", "legacy.py").unwrap_err();
        assert_eq!((err.line, err.column), (2, 1));
        assert!(err.message.contains("print"));

        let err = parse_source("def run(code):\n    exec code\n", "legacy.py").unwrap_err();
        assert_eq!(err.line, 2);

        // call syntax is Python 3
        assert!(parse_source("print(\"hello\")\nexec(\"x = 1\")\n", "modern.py").is_ok());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let source = "def broken(:\n    return 1\n";
        let err = parse_source(source, "broken.py").unwrap_err();
        assert_eq!(err.path, "broken.py");
        assert!(err.line >= 1);
    }

    #[test]
    fn test_line_ranges_are_ordered() {
        let source = r#"
@decorator
def decorated():
    pass

class A:
    class Inner:
        def deep(self):
            pass
"#;
        let unit = parse(source);
        for f in &unit.functions {
            assert!(f.line_start <= f.line_end);
        }
        // decorated functions start at the `def` line
        assert_eq!(unit.functions[0].line_start, 3);
        assert_eq!(unit.functions[1].class_name.as_deref(), Some("Inner"));
        assert!(unit.class("Inner").is_some());
    }

    #[test]
    fn test_string_value() {
        assert_eq!(string_value(r#""""doc""""#).as_deref(), Some("doc"));
        assert_eq!(string_value("r'raw'").as_deref(), Some("raw"));
        assert_eq!(string_value("f'{x}'"), None);
        assert_eq!(string_value("b'bytes'"), None);
    }
}
