//! Local repository loader
//!
//! Walks a directory (respecting `.gitignore`) and hands the analysis core
//! an ordered list of in-memory source files.

use crate::config::LoaderConfig;
use crate::models::SourceFile;
use crate::parsers::supported_extensions;
use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// Load every supported source file under `root`, sorted by relative path
pub fn load_local(root: &Path, config: &LoaderConfig) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        bail!("Repository path is not a directory: {}", root.display());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    let exclude_dirs = config.exclude_dirs.clone();
    let mut builder = WalkBuilder::new(&root);
    builder
        .hidden(true)
        .git_ignore(config.respect_gitignore)
        .git_global(false)
        .git_exclude(config.respect_gitignore)
        .require_git(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && exclude_dirs.iter().any(|d| entry.file_name() == d.as_str()))
        });

    let max_size = config.max_file_size_bytes();
    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| supported_extensions().contains(&ext));
        if !supported {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if size > max_size {
            debug!("Skipping {} ({} bytes over limit)", path.display(), size);
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                warn!("Skipping non-UTF-8 file: {}", path.display());
                continue;
            }
        };

        let relative_path = relative_path(&root, path);
        files.push(SourceFile {
            path: path.to_path_buf(),
            line_count: content.lines().count(),
            size,
            relative_path,
            content,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!("Loaded {} source files from {}", files.len(), root.display());
    Ok(files)
}

/// `/`-separated path of `path` below `root`
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relative_paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn test_loads_python_files_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pkg/b.py", b"x = 1\n");
        write(dir.path(), "a.py", b"def f():\n    pass\n");
        write(dir.path(), "pkg/stubs.pyi", b"def g() -> int: ...\n");
        write(dir.path(), "README.md", b"# readme\n");

        let files = load_local(dir.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["a.py", "pkg/b.py", "pkg/stubs.pyi"]);
        assert_eq!(files[0].line_count, 2);
        assert_eq!(files[0].size, 18);
    }

    #[test]
    fn test_skips_excluded_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", b"x = 1\n");
        write(dir.path(), "__pycache__/app.py", b"x = 1\n");
        write(dir.path(), "node_modules/pkg/m.py", b"x = 1\n");
        write(dir.path(), "build/out.py", b"x = 1\n");

        let files = load_local(dir.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["app.py", "build/out.py"]);

        let config = LoaderConfig {
            exclude_dirs: vec!["build".into()],
            ..Default::default()
        };
        let files = load_local(dir.path(), &config).unwrap();
        assert_eq!(relative_paths(&files), vec!["__pycache__/app.py", "app.py", "node_modules/pkg/m.py"]);
    }

    #[test]
    fn test_respects_gitignore() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", b"generated/\n");
        write(dir.path(), "generated/models.py", b"x = 1\n");
        write(dir.path(), "main.py", b"x = 1\n");

        let files = load_local(dir.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["main.py"]);

        let config = LoaderConfig {
            respect_gitignore: false,
            ..Default::default()
        };
        let files = load_local(dir.path(), &config).unwrap();
        assert_eq!(relative_paths(&files), vec!["generated/models.py", "main.py"]);
    }

    #[test]
    fn test_skips_non_utf8_and_oversized() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "latin1.py", &[0x63, 0x61, 0x66, 0xe9, 0x0a]);
        write(dir.path(), "ok.py", b"x = 1\n");
        write(dir.path(), "big.py", &vec![b'#'; 2 * 1024 * 1024]);

        let config = LoaderConfig {
            max_file_size_mb: 1,
            ..Default::default()
        };
        let files = load_local(dir.path(), &config).unwrap();
        assert_eq!(relative_paths(&files), vec!["ok.py"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_local(&missing, &LoaderConfig::default()).is_err());
    }
}
