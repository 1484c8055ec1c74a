//! Repository-wide aggregation of per-file metrics

use super::{round2, FileMetrics, FunctionComplexity};
use serde::{Deserialize, Serialize};

/// How many files the "most complex" ranking keeps
pub const TOP_COMPLEX_FILES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineTotals {
    pub total: usize,
    pub source: usize,
    pub comments: usize,
    pub blank: usize,
    pub comment_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureTotals {
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_imports: usize,
    pub average_functions_per_file: f64,
    pub average_classes_per_file: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighComplexityFile {
    pub file: String,
    pub count: usize,
    pub functions: Vec<FunctionComplexity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexFile {
    pub file: String,
    pub average_complexity: f64,
    pub max_complexity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetrics {
    pub total_files: usize,
    pub lines: LineTotals,
    pub structure: StructureTotals,
    /// Mean documentation coverage over parsed files
    pub average_documentation_coverage: f64,
    /// Mean of per-file averages, over files whose average is above zero
    pub average_complexity: f64,
    /// Mean maintainability index, over files scoring above zero
    pub average_maintainability: f64,
    pub total_high_complexity_files: usize,
    pub high_complexity_files: Vec<HighComplexityFile>,
    pub most_complex_files: Vec<ComplexFile>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        round2(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Aggregate per-file metrics, in file order
pub fn aggregate<'a>(files: impl IntoIterator<Item = (&'a str, &'a FileMetrics)>) -> RepositoryMetrics {
    let mut repo = RepositoryMetrics::default();
    let mut averages = Vec::new();
    let mut scores = Vec::new();
    let mut coverages = Vec::new();
    let mut ranked = Vec::new();

    for (path, metrics) in files {
        repo.total_files += 1;
        repo.lines.total += metrics.raw.loc;
        repo.lines.source += metrics.raw.sloc;
        repo.lines.comments += metrics.raw.comments;
        repo.lines.blank += metrics.raw.blank;

        let Some(code) = &metrics.code else {
            continue;
        };

        repo.structure.total_functions += code.structure.functions;
        repo.structure.total_classes += code.structure.classes;
        repo.structure.total_imports += code.structure.imports;
        coverages.push(code.documentation.coverage);

        if code.complexity.average > 0.0 {
            averages.push(code.complexity.average);
            ranked.push(ComplexFile {
                file: path.to_string(),
                average_complexity: code.complexity.average,
                max_complexity: code.complexity.max,
            });
        }
        if code.maintainability.score > 0.0 {
            scores.push(code.maintainability.score);
        }
        if code.complexity.high_complexity_count > 0 {
            repo.high_complexity_files.push(HighComplexityFile {
                file: path.to_string(),
                count: code.complexity.high_complexity_count,
                functions: code.complexity.high_complexity_functions.clone(),
            });
        }
    }

    if repo.lines.total > 0 {
        repo.lines.comment_ratio = round2(repo.lines.comments as f64 / repo.lines.total as f64 * 100.0);
    }
    if repo.total_files > 0 {
        let files = repo.total_files as f64;
        repo.structure.average_functions_per_file = round2(repo.structure.total_functions as f64 / files);
        repo.structure.average_classes_per_file = round2(repo.structure.total_classes as f64 / files);
    }

    repo.average_documentation_coverage = mean(&coverages);
    repo.average_complexity = mean(&averages);
    repo.average_maintainability = mean(&scores);
    repo.total_high_complexity_files = repo.high_complexity_files.len();

    // stable: equal averages keep file order
    ranked.sort_by(|a, b| b.average_complexity.total_cmp(&a.average_complexity));
    ranked.truncate(TOP_COMPLEX_FILES);
    repo.most_complex_files = ranked;

    repo
}
