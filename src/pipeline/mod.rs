//! Analysis pipeline
//!
//! Orchestrates a full repository analysis over in-memory files:
//! 1. Parse, extract and measure each file (parallel, input order kept)
//! 2. Run smell detectors per file
//! 3. Resolve file dependencies
//! 4. Build the call graph
//! 5. Group duplicate signatures
//! 6. Aggregate repository metrics and the summary
//!
//! Step 1 is a barrier: everything after it sees every structural unit.

use anyhow::Result;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{AnalysisConfig, DeadCodeScope};
use crate::detectors::{
    find_duplicates, repository_call_names, DetectorEngine, DuplicateCluster, FileContext, Liveness,
};
use crate::graph::{dependency, CallGraph, CallGraphAnalysis, DependencyAnalysis, FlatGraph};
use crate::metrics::repository::{self, ComplexFile, RepositoryMetrics};
use crate::metrics::{round2, FileMetrics};
use crate::models::{Smell, SmellSummary, SourceFile, StructuralUnit};
use crate::parsers::{python, ParseError};

/// Outcome of parsing one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Analyzed,
    Failed { error: ParseError },
}

impl FileStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, FileStatus::Failed { .. })
    }
}

/// Everything known about one file
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub path: String,
    pub size: u64,
    pub line_count: usize,
    #[serde(flatten)]
    pub status: FileStatus,
    pub unit: StructuralUnit,
    pub metrics: FileMetrics,
    pub smells: Vec<Smell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallGraphReport {
    pub graph: FlatGraph,
    pub analysis: CallGraphAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencySummary {
    pub has_circular_dependencies: bool,
    pub circular_dependencies: usize,
    pub isolated_files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_files: usize,
    pub analyzed_files: usize,
    pub failed_files: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_lines_of_code: usize,
    pub total_code_smells: usize,
    pub smells_by_severity: SmellSummary,
    /// Smell counts per kind, in first-seen order
    pub smells_by_type: IndexMap<String, usize>,
    pub average_complexity: f64,
    pub average_maintainability: f64,
    pub most_complex_files: Vec<ComplexFile>,
    pub duplicate_clusters: usize,
    pub recursive_functions: usize,
    pub dependency_analysis: DependencySummary,
}

/// Where and how long a run took; attached by the caller, not the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub source: String,
    pub analysis_time_seconds: f64,
}

/// Complete result of a run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
    pub files: Vec<FileAnalysis>,
    pub dependencies: DependencyAnalysis,
    pub call_graph: CallGraphReport,
    pub duplicates: Vec<DuplicateCluster>,
    pub repository_metrics: RepositoryMetrics,
    pub summary: Summary,
}

impl AnalysisReport {
    /// Structural units in file order
    pub fn units(&self) -> impl Iterator<Item = &StructuralUnit> {
        self.files.iter().map(|f| &f.unit)
    }

    pub fn file(&self, path: &str) -> Option<&FileAnalysis> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn with_metadata(mut self, source: impl Into<String>, elapsed: Duration) -> Self {
        self.metadata = Some(ReportMetadata {
            source: source.into(),
            analysis_time_seconds: round2(elapsed.as_secs_f64()),
        });
        self
    }
}

/// Full analysis pipeline.
pub struct Pipeline {
    config: AnalysisConfig,
    engine: DetectorEngine,
    /// Size of a dedicated rayon pool; `None` uses the global pool
    workers: Option<usize>,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            engine: DetectorEngine::default(),
            workers: None,
        }
    }

    pub fn with_engine(mut self, engine: DetectorEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers.filter(|&n| n > 0);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run `op` on the configured pool
    fn install<T: Send>(&self, op: impl FnOnce() -> T + Send) -> Result<T> {
        match self.workers {
            Some(workers) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
                Ok(pool.install(op))
            }
            None => Ok(op()),
        }
    }

    /// Parse, extract and measure every file. No smells yet.
    pub fn extract(&self, files: &[SourceFile]) -> Result<Vec<FileAnalysis>> {
        self.install(|| self.extract_all(files))
    }

    /// Run the whole pipeline
    pub fn analyze(&self, files: &[SourceFile]) -> Result<AnalysisReport> {
        self.install(|| self.analyze_all(files))
    }

    fn extract_all(&self, files: &[SourceFile]) -> Vec<FileAnalysis> {
        let max_complexity = self.config.thresholds.max_complexity;
        files
            .par_iter()
            .map(|file| analyze_file(file, max_complexity))
            .collect()
    }

    fn analyze_all(&self, files: &[SourceFile]) -> AnalysisReport {
        let start = Instant::now();
        info!("Analyzing {} files", files.len());

        let mut analyses = self.extract_all(files);
        let failed = analyses.iter().filter(|a| a.status.is_failed()).count();
        if failed > 0 {
            warn!("{} of {} files failed to parse", failed, analyses.len());
        }
        debug!("Extraction done in {:?}", start.elapsed());

        let units: Vec<StructuralUnit> = analyses.iter().map(|a| a.unit.clone()).collect();
        self.detect_smells(files, &units, &mut analyses);

        let dependencies = dependency::resolve(&units);
        let call_graph = CallGraph::build(&units);
        let call_graph = CallGraphReport {
            graph: call_graph.to_flat(),
            analysis: call_graph.analyze(),
        };
        let duplicates = find_duplicates(&units);
        let repository_metrics =
            repository::aggregate(analyses.iter().map(|a| (a.path.as_str(), &a.metrics)));

        let summary = summarize(&analyses, &dependencies, &call_graph, &duplicates, &repository_metrics);
        info!(
            "Analysis complete in {:.2}s: {} functions, {} classes, {} smells",
            start.elapsed().as_secs_f64(),
            summary.total_functions,
            summary.total_classes,
            summary.total_code_smells
        );

        AnalysisReport {
            metadata: None,
            files: analyses,
            dependencies,
            call_graph,
            duplicates,
            repository_metrics,
            summary,
        }
    }

    /// Fill in smells for every parsed file; failed files get none
    fn detect_smells(&self, files: &[SourceFile], units: &[StructuralUnit], analyses: &mut [FileAnalysis]) {
        let thresholds = &self.config.thresholds;
        let repository_calls = match self.config.dead_code.scope {
            DeadCodeScope::File => None,
            DeadCodeScope::Repository => Some(repository_call_names(units)),
        };
        let liveness = match &repository_calls {
            Some(names) => Liveness::Repository(names),
            None => Liveness::File,
        };

        let parsed: Vec<usize> = (0..analyses.len())
            .filter(|&i| !analyses[i].status.is_failed())
            .collect();
        let contexts: Vec<FileContext> = parsed
            .iter()
            .map(|&i| FileContext::new(&units[i], &files[i].content, thresholds).with_liveness(liveness))
            .collect();
        let smells = self.engine.run_all(&contexts);

        for (i, smells) in parsed.into_iter().zip(smells) {
            analyses[i].smells = smells;
        }
    }
}

/// Parse and measure one file; a parse failure is recorded, not raised
pub fn analyze_file(file: &SourceFile, max_complexity: u32) -> FileAnalysis {
    let path = file.relative_path.as_str();
    let parsed = python::parse_tree(&file.content, path).map(|tree| {
        let unit = python::extract_tree(&tree, &file.content, path);
        let metrics = FileMetrics::compute(&unit, &tree, &file.content, max_complexity);
        (unit, metrics)
    });

    let (status, unit, metrics) = match parsed {
        Ok((unit, metrics)) => (FileStatus::Analyzed, unit, metrics),
        Err(error) => {
            debug!("Parse failed: {}", error);
            (
                FileStatus::Failed { error },
                StructuralUnit::empty(path),
                FileMetrics::raw_only(&file.content),
            )
        }
    };

    FileAnalysis {
        path: path.to_string(),
        size: file.size,
        line_count: file.line_count,
        status,
        unit,
        metrics,
        smells: Vec::new(),
    }
}

fn summarize(
    files: &[FileAnalysis],
    dependencies: &DependencyAnalysis,
    call_graph: &CallGraphReport,
    duplicates: &[DuplicateCluster],
    repository_metrics: &RepositoryMetrics,
) -> Summary {
    let mut smells_by_type: IndexMap<String, usize> = IndexMap::new();
    for smell in files.iter().flat_map(|f| &f.smells) {
        *smells_by_type.entry(smell.kind.label().to_string()).or_default() += 1;
    }
    let smells_by_severity = SmellSummary::from_smells(files.iter().flat_map(|f| &f.smells));
    let failed_files = files.iter().filter(|f| f.status.is_failed()).count();

    Summary {
        total_files: files.len(),
        analyzed_files: files.len() - failed_files,
        failed_files,
        total_functions: files.iter().map(|f| f.unit.functions.len()).sum(),
        total_classes: files.iter().map(|f| f.unit.classes.len()).sum(),
        total_lines_of_code: files.iter().map(|f| f.line_count).sum(),
        total_code_smells: smells_by_severity.total,
        smells_by_severity,
        smells_by_type,
        average_complexity: repository_metrics.average_complexity,
        average_maintainability: repository_metrics.average_maintainability,
        most_complex_files: repository_metrics.most_complex_files.clone(),
        duplicate_clusters: duplicates.len(),
        recursive_functions: call_graph.analysis.recursive_functions.len(),
        dependency_analysis: DependencySummary {
            has_circular_dependencies: dependencies.has_circular_dependencies,
            circular_dependencies: dependencies.circular_dependencies.len(),
            isolated_files: dependencies.isolated_files.len(),
        },
    }
}
