//! Core data models for the archaeologist
//!
//! These models are used throughout the codebase for representing
//! source files, extracted code entities, and smells.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source file handed to the analysis core by the loader.
///
/// The core never touches the filesystem; `content` is all it reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the repository root, `/`-separated
    pub relative_path: String,
    pub content: String,
    pub size: u64,
    pub line_count: usize,
}

impl SourceFile {
    /// Build an in-memory file (size and line count derived from content)
    pub fn from_content(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let content = content.into();
        Self {
            path: PathBuf::from(&relative_path),
            size: content.len() as u64,
            line_count: content.lines().count(),
            relative_path,
            content,
        }
    }
}

/// Severity levels for smells
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A function or method definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// Enclosing class name, only for direct members of a class body
    pub class_name: Option<String>,
    /// Named parameters, in declaration order (no `*args` / `**kwargs`)
    pub parameters: Vec<String>,
    /// Variadic catch-alls, rendered as `*args` / `**kwargs`
    pub variadic: Vec<String>,
    /// Named parameters that are neither positional-only nor keyword-only
    pub positional_count: usize,
    pub return_annotation: Option<String>,
    pub docstring: Option<String>,
    pub line_start: u32,
    pub line_end: u32,
    pub decorators: Vec<String>,
    pub is_async: bool,
    /// Unresolved callee names, reduced to their rightmost identifier
    pub calls: Vec<String>,
    pub complexity: u32,
    pub line_count: u32,
}

impl FunctionRecord {
    /// Whether this function is a method of `class_name`
    pub fn is_method(&self) -> bool {
        self.class_name.is_some()
    }

    /// Call-graph identifier: `file::name` or `file::Class.name`
    pub fn qualified_id(&self, file: &str) -> String {
        match &self.class_name {
            Some(class) => format!("{}::{}.{}", file, class, self.name),
            None => format!("{}::{}", file, self.name),
        }
    }
}

/// A class definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub bases: Vec<String>,
    pub docstring: Option<String>,
    pub methods: Vec<String>,
    pub decorators: Vec<String>,
    pub line_start: u32,
    pub line_end: u32,
    pub line_count: u32,
}

/// An import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportRecord {
    /// `import a.b, c as d`
    Plain {
        modules: Vec<String>,
        /// (module, alias) pairs for `as` imports
        aliases: Vec<(String, String)>,
        line: u32,
    },
    /// `from ..pkg.mod import x, y`
    From {
        module: Option<String>,
        names: Vec<String>,
        /// Number of leading dots
        level: u32,
        line: u32,
    },
}

impl ImportRecord {
    /// Module paths this import refers to, as written
    pub fn module_names(&self) -> Vec<&str> {
        match self {
            ImportRecord::Plain { modules, .. } => modules.iter().map(String::as_str).collect(),
            ImportRecord::From { module, .. } => module.as_deref().into_iter().collect(),
        }
    }
}

/// A module-level assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub line: u32,
}

/// Parsed representation of one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralUnit {
    pub path: String,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub imports: Vec<ImportRecord>,
    pub globals: Vec<GlobalVariable>,
}

impl StructuralUnit {
    /// An empty unit, used for files that failed to parse
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Look up a class defined in this file
    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Total number of entities found
    pub fn entity_count(&self) -> usize {
        self.functions.len() + self.classes.len()
    }
}

/// Kind of entity a smell points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Function,
    Class,
}

/// What a smell is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SmellKind {
    LongFunction { name: String, lines: u32 },
    LongClass { name: String, lines: u32, methods: usize },
    MissingDocstring { name: String, entity: EntityKind },
    TooManyParameters { name: String, count: usize, parameters: Vec<String> },
    DeadCode { name: String },
    MagicNumber { value: String, context: String },
    NonConstantGlobal { name: String },
}

impl SmellKind {
    /// Stable category label used for grouping
    pub fn label(&self) -> &'static str {
        match self {
            SmellKind::LongFunction { .. } => "long_function",
            SmellKind::LongClass { .. } => "long_class",
            SmellKind::MissingDocstring { .. } => "missing_docstring",
            SmellKind::TooManyParameters { .. } => "too_many_parameters",
            SmellKind::DeadCode { .. } => "dead_code",
            SmellKind::MagicNumber { .. } => "magic_number",
            SmellKind::NonConstantGlobal { .. } => "non_constant_global",
        }
    }
}

/// A heuristic quality issue at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Smell {
    pub line: u32,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: SmellKind,
}

/// Count of smells per severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmellSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub total: usize,
}

impl SmellSummary {
    pub fn from_smells<'a>(smells: impl IntoIterator<Item = &'a Smell>) -> Self {
        let mut summary = Self::default();
        for s in smells {
            match s.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info => summary.info += 1,
            }
            summary.total += 1;
        }
        summary
    }
}
