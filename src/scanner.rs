use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: [&str; 2] = ["hpp", "cpp"];

/// Paths left out of a scan.
#[derive(Debug, Default)]
pub struct IgnoreFilter {
    patterns: Vec<Pattern>,
    excluded_dirs: Vec<PathBuf>,
}

impl IgnoreFilter {
    pub fn new(globs: &[String]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|glob| Pattern::new(glob).with_context(|| format!("Invalid ignore glob `{glob}`")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            excluded_dirs: Vec::new(),
        })
    }

    /// Skip everything below `dir`, e.g. a previous run's output.
    pub fn exclude_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded_dirs.push(dir.into());
        self
    }

    /// Globs match either the path relative to `root` or the full path.
    pub fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        if self.excluded_dirs.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative) || pattern.matches_path(path))
    }
}

/// All C++ headers and sources below `dir`, sorted.
pub fn scan_project(dir: &Path, filter: &IgnoreFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if !is_source {
            continue;
        }

        // Test drivers never declare annotated enums
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if file_name.starts_with("test_") {
            continue;
        }

        if filter.is_ignored(dir, path) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}
