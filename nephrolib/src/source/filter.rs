//! Image file filtering and discovery with glob pattern support.
//!
//! A biopsy directory holds one export file per image. Eligible files are
//! selected by extension (`xls` by default) and, optionally, by
//! include/exclude glob patterns.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::NephroError;
use crate::Result;

/// Extension of instrument export files.
pub const DEFAULT_EXTENSION: &str = "xls";

/// Configuration for image file filtering.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Required file extension, without the dot (case-sensitive)
    pub extension: String,
    /// Glob patterns to include (if empty, include every file with the extension)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Create a new filter config (includes all `.xls` files).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required extension. A leading dot is ignored.
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Check if a path matches the filter criteria.
    ///
    /// A path matches if:
    /// 1. It has the configured extension
    /// 2. It doesn't match any exclude pattern
    /// 3. It matches at least one include pattern (or include is empty)
    pub fn matches(&self, path: &Path) -> bool {
        if path
            .extension()
            .is_none_or(|ext| ext != self.extension.as_str())
        {
            return false;
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| NephroError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Check that `dir` exists and is a directory.
pub(crate) fn require_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(NephroError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(NephroError::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// Discover the image export files directly inside a biopsy directory.
///
/// Subdirectories are not searched. The result is sorted by path, which
/// fixes the order images are processed in.
pub fn discover_image_files(dir: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    require_dir(dir)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => NephroError::Io(io),
            None => NephroError::PathNotFound(dir.to_path_buf()),
        })?;

        let path = entry.path();
        if entry.file_type().is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        }
    }

    // Sort for deterministic output
    files.sort();

    Ok(files)
}
