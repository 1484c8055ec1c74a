//! Maintainability index (radon variant)

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    A,
    B,
    C,
}

impl Rank {
    pub fn from_score(score: f64) -> Self {
        if score >= 20.0 {
            Rank::A
        } else if score >= 10.0 {
            Rank::B
        } else {
            Rank::C
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rank::A => "good",
            Rank::B => "moderate",
            Rank::C => "poor",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::A => write!(f, "A"),
            Rank::B => write!(f, "B"),
            Rank::C => write!(f, "C"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintainability {
    pub score: f64,
    pub rank: Rank,
}

impl Maintainability {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            rank: Rank::from_score(score),
        }
    }
}

/// Maintainability index on a 0..=100 scale.
///
/// * `volume` - Halstead volume of the file
/// * `complexity` - total cyclomatic complexity of the file
/// * `sloc` - source lines
/// * `comment_percent` - comment lines as a percentage of source lines
pub fn index(volume: f64, complexity: u32, sloc: usize, comment_percent: f64) -> f64 {
    if volume <= 0.0 || sloc == 0 {
        return 100.0;
    }
    let comments = (2.46 * comment_percent.to_radians()).sqrt().sin();
    let raw = 171.0 - 5.2 * volume.ln() - 0.23 * complexity as f64 - 16.2 * (sloc as f64).ln()
        + 50.0 * comments;
    (raw * 100.0 / 171.0).clamp(0.0, 100.0)
}
