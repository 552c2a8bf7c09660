//! Input options for biopsy extraction.
//!
//! This module contains the configuration types that control which files are
//! read and what happens when one of them is invalid.

use std::str::FromStr;

use crate::source::FilterConfig;

/// What to do when an image file fails to extract.
///
/// Invalid image file *names* are always fatal; this only covers the
/// contents of files that were accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole run on the first invalid file
    #[default]
    Abort,
    /// Record the file as skipped and continue with the next one
    Skip,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(ErrorPolicy::Abort),
            "skip" => Ok(ErrorPolicy::Skip),
            _ => Err(format!("Unknown error policy: {s}. Use: abort, skip")),
        }
    }
}

/// Options for extracting biopsies.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Which files in a biopsy directory are image exports
    pub file_filter: FilterConfig,
    /// Handling of files that fail to extract
    pub error_policy: ErrorPolicy,
}

impl ExtractOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }

    /// Set the error policy.
    pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}
