//! Directory layout conventions.
//!
//! ```text
//! root/
//!   B-0142/        one directory per biopsy, named by biopsy id
//!     1.xls        one export per image, named by image id
//!     2.xls
//!   B-0143/
//!     ...
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::NephroError;
use crate::Result;

use super::filter::require_dir;

/// Derive the image id from an export file name (`17.xls` → `17`).
///
/// The stem must be a positive integer.
pub fn image_id_from_path(path: impl AsRef<Path>) -> Result<u32> {
    let path = path.as_ref();
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<u32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| NephroError::InvalidImageFilename(path.to_path_buf()))
}

/// Biopsy id of a biopsy directory: its final path component.
pub fn biopsy_id_from_dir(dir: impl AsRef<Path>) -> String {
    let dir = dir.as_ref();
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.to_string_lossy().to_string())
}

/// Check if a directory should be skipped when listing biopsies.
fn should_skip_dir(name: &str) -> bool {
    name.starts_with('.')
}

/// List the biopsy directories directly under `root`, sorted by path.
pub fn discover_biopsy_dirs(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    require_dir(root)?;

    let mut dirs = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => NephroError::Io(io),
            None => NephroError::PathNotFound(root.to_path_buf()),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or("");
        if should_skip_dir(name) {
            continue;
        }

        dirs.push(entry.path().to_path_buf());
    }

    dirs.sort();

    Ok(dirs)
}
