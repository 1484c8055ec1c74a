//! Project configuration
//!
//! Loaded from `archaeologist.toml` or `.archaeologistrc.json` in the
//! repository root, or from an explicit path. Every table is optional; a
//! missing file means defaults. A file that exists but does not parse or
//! validate is an error, reported before any source file is touched.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;


/// Config file names searched in the repository root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["archaeologist.toml", ".archaeologistrc.json"];

/// Directories skipped by the loader unless overridden
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["__pycache__", ".git", "venv", ".venv", "node_modules"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config format: {} (use .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Limits the metrics and smell rules compare against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Functions above this cyclomatic complexity are "high complexity"
    pub max_complexity: u32,
    pub max_function_length: u32,
    pub max_class_length: u32,
    /// Accepted and validated, not used by any rule
    pub duplicate_threshold: f64,
    /// Parameters, excluding `self` / `cls`
    pub max_parameters: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_complexity: 10,
            max_function_length: 50,
            max_class_length: 300,
            duplicate_threshold: 0.8,
            max_parameters: 5,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("thresholds.max_complexity", self.max_complexity as u64),
            ("thresholds.max_function_length", self.max_function_length as u64),
            ("thresholds.max_class_length", self.max_class_length as u64),
            ("thresholds.max_parameters", self.max_parameters as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive integer".to_string(),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err(ConfigError::Invalid {
                field: "thresholds.duplicate_threshold",
                reason: format!("{} is outside [0, 1]", self.duplicate_threshold),
            });
        }
        Ok(())
    }
}

/// Where dead-code detection looks for callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeadCodeScope {
    /// Only calls made in the same file
    #[default]
    File,
    /// Calls made anywhere in the analyzed files
    Repository,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadCodeConfig {
    pub scope: DeadCodeScope,
}

/// File discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory names skipped anywhere in the tree
    pub exclude_dirs: Vec<String>,
    /// Files larger than this are skipped
    pub max_file_size_mb: u64,
    pub respect_gitignore: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_file_size_mb: 10,
            respect_gitignore: true,
        }
    }
}

impl LoaderConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub thresholds: Thresholds,
    pub dead_code: DeadCodeConfig,
    pub loader: LoaderConfig,
}

impl AnalysisConfig {
    /// Resolve configuration for a repository.
    ///
    /// An explicit path must exist. Otherwise the first of
    /// [`CONFIG_FILE_NAMES`] found in `repo_root` is used, falling back to
    /// defaults.
    pub fn load(repo_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        for name in CONFIG_FILE_NAMES {
            let path = repo_root.join(name);
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        debug!("No project config found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a single config file, format chosen by extension
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            Some("json") => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        config.validate()?;
        debug!("Loaded project config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.loader.max_file_size_mb == 0 {
            return Err(ConfigError::Invalid {
                field: "loader.max_file_size_mb",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

/// Commented default config written by `archaeologist init`
pub fn default_config_toml() -> String {
    let defaults = AnalysisConfig::default();
    let excludes = defaults
        .loader
        .exclude_dirs
        .iter()
        .map(|d| format!("\"{d}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# archaeologist configuration

[thresholds]
# Functions with cyclomatic complexity above this are reported
max_complexity = {max_complexity}
# Line counts above these are long functions / classes
max_function_length = {max_function_length}
max_class_length = {max_class_length}
# Accepted for compatibility; no rule reads it
duplicate_threshold = {duplicate_threshold}
# Parameters excluding self/cls
max_parameters = {max_parameters}

[dead_code]
# "file": a function is dead if nothing in its own file calls it
# "repository": if nothing in any analyzed file calls it
scope = "file"

[loader]
exclude_dirs = [{excludes}]
max_file_size_mb = {max_file_size_mb}
respect_gitignore = {respect_gitignore}
"#,
        max_complexity = defaults.thresholds.max_complexity,
        max_function_length = defaults.thresholds.max_function_length,
        max_class_length = defaults.thresholds.max_class_length,
        duplicate_threshold = defaults.thresholds.duplicate_threshold,
        max_parameters = defaults.thresholds.max_parameters,
        max_file_size_mb = defaults.loader.max_file_size_mb,
        respect_gitignore = defaults.loader.respect_gitignore,
    )
}
