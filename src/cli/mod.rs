//! CLI command definitions and handlers

mod analyze;
mod chains;
mod init;

use crate::config::{AnalysisConfig, DeadCodeScope};
use crate::graph::call_graph::DEFAULT_CHAIN_DEPTH;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Archaeologist - static analysis for Python codebases
#[derive(Parser, Debug)]
#[command(name = "archaeologist")]
#[command(
    version,
    about = "Static analysis for Python codebases: structure, metrics, smells, dependencies and call graphs",
    after_help = "\
Examples:
  archaeologist                                  Analyze the current directory
  archaeologist path/to/repo analyze --format json
  archaeologist . analyze --dead-code-scope repository
  archaeologist . chains app/main.py::main --depth 3
  archaeologist . init                           Write a default archaeologist.toml"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file (default: archaeologist.toml or .archaeologistrc.json in the repository)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: all cores)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the repository (default command)
    Analyze {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Which call names keep a function alive (overrides the config file)
        #[arg(long, value_enum)]
        dead_code_scope: Option<DeadCodeScope>,
    },

    /// Print call chains starting at a function
    Chains {
        /// Function id, e.g. `pkg/mod.py::helper` or `pkg/mod.py::Class.method`
        function_id: String,

        /// Maximum number of calls per chain
        #[arg(long, default_value_t = DEFAULT_CHAIN_DEPTH)]
        depth: usize,
    },

    /// Write a default archaeologist.toml
    Init,
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let config = AnalysisConfig::load(&cli.path, cli.config.as_deref())
        .context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Chains { function_id, depth }) => {
            let config = load_config(&cli)?;
            chains::run(&cli.path, &config, cli.workers, function_id, *depth)
        }

        Some(Commands::Analyze {
            format,
            output,
            dead_code_scope,
        }) => {
            let mut config = load_config(&cli)?;
            if let Some(scope) = dead_code_scope {
                config.dead_code.scope = *scope;
            }
            analyze::run(&cli.path, &config, cli.workers, format, output.as_deref())
        }

        None => {
            let config = load_config(&cli)?;
            analyze::run(&cli.path, &config, cli.workers, "text", None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["archaeologist"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from([
            "archaeologist",
            "repo",
            "analyze",
            "--format",
            "json",
            "--dead-code-scope",
            "repository",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.path, PathBuf::from("repo"));
        assert_eq!(cli.workers, Some(2));
        match cli.command {
            Some(Commands::Analyze {
                format,
                dead_code_scope,
                output,
            }) => {
                assert_eq!(format, "json");
                assert_eq!(dead_code_scope, Some(DeadCodeScope::Repository));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_chains_args() {
        let cli = Cli::try_parse_from(["archaeologist", "chains", "a.py::f", "--depth", "3"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        match cli.command {
            Some(Commands::Chains { function_id, depth }) => {
                assert_eq!(function_id, "a.py::f");
                assert_eq!(depth, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["archaeologist", "analyze", "--format", "sarif"]).is_err());
    }
}
