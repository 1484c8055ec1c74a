//! Base detector trait and types
//!
//! This module defines the core abstractions for smell detection:
//! - `Detector` trait that all per-file detectors implement
//! - `FileContext` with everything a detector may look at
//! - `Liveness` for deciding which call names keep a function alive

use crate::config::Thresholds;
use crate::models::{Smell, StructuralUnit};
use rustc_hash::FxHashSet;

/// The set of call names that count as "used"
#[derive(Debug, Clone, Copy)]
pub enum Liveness<'a> {
    /// Only calls made inside the file itself
    File,
    /// Calls made anywhere in the analyzed files
    Repository(&'a FxHashSet<String>),
}

/// Input to a detector: one file's structure and text
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub unit: &'a StructuralUnit,
    pub content: &'a str,
    pub thresholds: &'a Thresholds,
    pub liveness: Liveness<'a>,
}

impl<'a> FileContext<'a> {
    pub fn new(unit: &'a StructuralUnit, content: &'a str, thresholds: &'a Thresholds) -> Self {
        Self {
            unit,
            content,
            thresholds,
            liveness: Liveness::File,
        }
    }

    pub fn with_liveness(mut self, liveness: Liveness<'a>) -> Self {
        self.liveness = liveness;
        self
    }
}

/// Trait for all per-file smell detectors
///
/// Detectors are pure: the same context always yields the same smells, in
/// the same order.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyDetector;
///
/// impl Detector for MyDetector {
///     fn name(&self) -> &'static str {
///         "my-detector"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific code smell"
///     }
///
///     fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
///         vec![]
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector
    fn name(&self) -> &'static str;

    /// Human-readable description of what this detector finds
    fn description(&self) -> &'static str;

    /// Run detection over one file
    fn detect(&self, ctx: &FileContext) -> Vec<Smell>;
}
