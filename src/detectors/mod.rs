//! Code smell detectors
//!
//! Threshold rules over the structural unit and raw text of one file, plus
//! a repository-wide duplicate signature pass.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DetectorEngine                          │
//! │  - Registers detectors                                      │
//! │  - Runs them per file in parallel (rayon)                   │
//! │  - Keeps file order and detector order                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Detector Trait                         │
//! │  - name(): Unique identifier                                │
//! │  - description(): Human-readable description                │
//! │  - detect(ctx): Smells for one file                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use archaeologist::detectors::{DetectorEngine, FileContext};
//!
//! let engine = DetectorEngine::default();
//! let smells = engine.run(&FileContext::new(&unit, &content, &thresholds));
//! ```

mod base;
mod engine;

mod dead_code;
mod duplicate_code;
mod global_variables;
mod long_classes;
mod long_methods;
mod long_parameter;
mod magic_numbers;
mod missing_docstrings;

pub use base::{Detector, FileContext, Liveness};
pub use engine::{default_detectors, DetectorEngine};

pub use dead_code::{repository_call_names, DeadCodeDetector};
pub use duplicate_code::{find_duplicates, DuplicateCluster, DuplicateOccurrence};
pub use global_variables::GlobalVariablesDetector;
pub use long_classes::LongClassDetector;
pub use long_methods::LongFunctionDetector;
pub use long_parameter::LongParameterListDetector;
pub use magic_numbers::MagicNumbersDetector;
pub use missing_docstrings::MissingDocstringDetector;

use crate::models::Severity;

/// Severity for a length over `limit`: high past twice the limit
fn length_severity(lines: u32, limit: u32) -> Severity {
    if lines > limit.saturating_mul(2) {
        Severity::High
    } else {
        Severity::Medium
    }
}
