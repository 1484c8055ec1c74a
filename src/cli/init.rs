//! Init command - write a default config file

use crate::config::{default_config_toml, CONFIG_FILE_NAMES};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| repo_path.join(name))
        .find(|p| p.exists())
    {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(existing.display()).cyan()
        );
        return Ok(());
    }

    let config_path = repo_path.join(CONFIG_FILE_NAMES[0]);
    std::fs::write(&config_path, default_config_toml())
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Adjust thresholds", style(CONFIG_FILE_NAMES[0]).cyan());
    println!("  {} Run analysis", style("archaeologist . analyze").cyan());

    Ok(())
}
