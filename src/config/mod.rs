//! Configuration module for archaeologist
//!
//! This module handles:
//! - Project-level configuration (archaeologist.toml / .archaeologistrc.json)
//! - Smell and metric thresholds
//! - Loader exclusions

mod project_config;

pub use project_config::{
    default_config_toml, AnalysisConfig, ConfigError, DeadCodeConfig, DeadCodeScope, LoaderConfig,
    Thresholds, CONFIG_FILE_NAMES, DEFAULT_EXCLUDE_DIRS,
};
