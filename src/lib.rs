//! Archaeologist - static analysis for Python codebases
//!
//! The core takes an ordered list of in-memory [`models::SourceFile`]s and
//! never touches the filesystem; [`loader`] and [`cli`] sit at the edge.
//!
//! ```ignore
//! use archaeologist::{config::AnalysisConfig, loader, pipeline::Pipeline};
//!
//! let config = AnalysisConfig::load(repo, None)?;
//! let files = loader::load_local(repo, &config.loader)?;
//! let report = Pipeline::new(config).analyze(&files)?;
//! ```

pub mod cli;
pub mod config;
pub mod detectors;
pub mod graph;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;
