//! Source file discovery for the build system.
//!
//! Finds the files a task compiles by expanding a glob pattern under the
//! task's source directory.

use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Error during source discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, #[source] glob::PatternError),
}

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (root-resolved) path
    pub path: PathBuf,
    /// Path relative to the source directory
    pub relative: PathBuf,
}

fn match_options() -> MatchOptions {
    MatchOptions { case_sensitive: true, require_literal_separator: true, require_literal_leading_dot: false }
}

/// Discover files under `base_dir` matching `pattern`.
///
/// Directories are never returned. Results are sorted by path.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
    let escaped_base = Pattern::escape(&base_dir.to_string_lossy());
    let full_pattern = format!("{}/{}", escaped_base.trim_end_matches('/'), pattern);

    let paths = glob_with(&full_pattern, match_options())
        .map_err(|e| DiscoveryError::InvalidPattern(pattern.to_string(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }
                let relative = match path.strip_prefix(base_dir) {
                    Ok(rel) => rel.to_path_buf(),
                    Err(_) => continue,
                };
                files.push(SourceFile { path, relative });
            }
            Err(e) => {
                // Unreadable entries are skipped, the rest of the tree still builds
                warn!("error reading path: {}", e);
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Check if a path is a SCSS partial (`_variables.scss`).
///
/// Partials are only meaningful when imported and are never compiled on
/// their own.
pub fn is_partial(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with('_'))
}

/// Discover compilable SCSS files, skipping partials.
pub fn discover_stylesheets(
    base_dir: &Path,
    pattern: &str,
) -> Result<Vec<SourceFile>, DiscoveryError> {
    let mut files = discover_files(base_dir, pattern)?;
    files.retain(|f| !is_partial(&f.path));
    Ok(files)
}
