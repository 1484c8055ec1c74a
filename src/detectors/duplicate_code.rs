//! Duplicate function signature detection
//!
//! Groups every function in the repository by `(name, parameter count)`,
//! counting the parameters that are neither positional-only nor keyword-only.
//! A group with more than one member is a cluster of likely copies. This is
//! a signature match only; bodies are not compared.

use crate::models::StructuralUnit;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateOccurrence {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub function: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// Shared function name
    pub signature: String,
    pub parameter_count: usize,
    pub count: usize,
    pub occurrences: Vec<DuplicateOccurrence>,
}

/// Clusters in order of first occurrence; occurrences in file order
pub fn find_duplicates(units: &[StructuralUnit]) -> Vec<DuplicateCluster> {
    let mut groups: IndexMap<(&str, usize), Vec<DuplicateOccurrence>> = IndexMap::new();

    for unit in units {
        for func in &unit.functions {
            groups
                .entry((func.name.as_str(), func.positional_count))
                .or_default()
                .push(DuplicateOccurrence {
                    file: unit.path.clone(),
                    class_name: func.class_name.clone(),
                    function: func.name.clone(),
                    line: func.line_start,
                });
        }
    }

    groups
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() > 1)
        .map(|((name, parameter_count), occurrences)| DuplicateCluster {
            signature: name.to_string(),
            parameter_count,
            count: occurrences.len(),
            occurrences,
        })
        .collect()
}
