//! Source code parsers using tree-sitter
//!
//! Turns one [`SourceFile`] into a [`StructuralUnit`] (functions, classes,
//! imports, module-level assignments). Only the Python grammar is supported;
//! one grammar per run.

pub mod python;

use crate::models::{SourceFile, StructuralUnit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source text that is not valid for the grammar.
///
/// Recovered per file by the pipeline: the file is marked failed and the run
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{path}:{line}:{column}: {message}")]
pub struct ParseError {
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl ParseError {
    pub fn new(path: impl Into<String>, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Extract the structural unit of a file.
///
/// Fails with [`ParseError`] instead of returning an empty unit, so callers can
/// tell "zero functions" from "could not parse".
pub fn extract(file: &SourceFile) -> Result<StructuralUnit, ParseError> {
    if !is_supported(&file.relative_path) {
        return Err(ParseError::new(
            &file.relative_path,
            0,
            0,
            "unsupported file type (only Python is analyzed)",
        ));
    }
    python::parse_source(&file.content, &file.relative_path)
}

/// Get all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["py", "pyi"]
}

/// Whether a path has a supported extension
pub fn is_supported(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| supported_extensions().contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_python_file() {
        let file = SourceFile::from_content("pkg/mod.py", "def f():\n    return 1\n");
        let unit = extract(&file).expect("valid python should extract");
        assert_eq!(unit.path, "pkg/mod.py");
        assert_eq!(unit.functions.len(), 1);
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let file = SourceFile::from_content("notes.txt", "hello");
        let err = extract(&file).unwrap_err();
        assert!(err.message.contains("unsupported"));
    }

    #[test]
    fn test_empty_file_is_not_a_failure() {
        let file = SourceFile::from_content("empty.py", "");
        let unit = extract(&file).expect("empty file parses");
        assert_eq!(unit.entity_count(), 0);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("a/b.py"));
        assert!(is_supported("stubs.pyi"));
        assert!(!is_supported("main.rs"));
        assert!(!is_supported("Makefile"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("a.py", 3, 7, "invalid syntax");
        assert_eq!(err.to_string(), "a.py:3:7: invalid syntax");
    }
}
