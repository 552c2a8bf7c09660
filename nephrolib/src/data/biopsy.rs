//! Biopsy-level aggregation.
//!
//! This module provides the main entry points for extracting every image of a
//! biopsy directory, or every biopsy under a root directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::options::{ErrorPolicy, ExtractOptions};
use crate::source::{
    biopsy_id_from_dir, discover_biopsy_dirs, discover_image_files, image_id_from_path,
};
use crate::Result;

use super::image::{extract_image_file, ImageResult};
use super::structures::GlomerulusData;

/// A file left out under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    /// Display form of the error that caused the skip
    pub reason: String,
}

/// All glomerulus and podocyte data for one biopsy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiopsyResult {
    pub id: String,
    /// Per-image results, in processing order
    pub images: Vec<ImageResult>,
    /// Files that failed to extract and were skipped
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl BiopsyResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            images: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Every glomerulus of the biopsy, image by image, each image in
    /// discovery order.
    pub fn glomeruli(&self) -> impl Iterator<Item = &GlomerulusData> {
        self.images.iter().flat_map(|image| image.glomeruli.iter())
    }

    pub fn glomerulus_count(&self) -> usize {
        self.images.iter().map(|i| i.glomerulus_count()).sum()
    }

    pub fn podocyte_count(&self) -> usize {
        self.images.iter().map(|i| i.podocyte_count()).sum()
    }
}

/// Results for every biopsy under a root directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootResult {
    pub root: PathBuf,
    pub biopsies: Vec<BiopsyResult>,
}

impl RootResult {
    pub fn glomerulus_count(&self) -> usize {
        self.biopsies.iter().map(|b| b.glomerulus_count()).sum()
    }

    pub fn podocyte_count(&self) -> usize {
        self.biopsies.iter().map(|b| b.podocyte_count()).sum()
    }
}

/// Extract every image export in a biopsy directory.
///
/// Files are processed in path order. A file whose name is not a positive
/// integer aborts the biopsy regardless of the error policy; a file whose
/// contents are invalid aborts it under [`ErrorPolicy::Abort`] and is
/// recorded in [`BiopsyResult::skipped`] under [`ErrorPolicy::Skip`].
///
/// # Example
///
/// ```rust
/// use nephrolib::{extract_biopsy, ExtractOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("1.xls"), "Area\tFeret\n\
///     1\t8914.940\t128.412\t226.768\t248.444\t117.031\t85.135\n\
///     2\t23.243\t8.696\t214.429\t267.119\t57.529\t3.673\n").unwrap();
///
/// let result = extract_biopsy("B1", dir.path(), &ExtractOptions::new()).unwrap();
/// assert_eq!(result.glomerulus_count(), 1);
/// assert_eq!(result.podocyte_count(), 1);
/// ```
pub fn extract_biopsy(
    id: impl Into<String>,
    dir: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<BiopsyResult> {
    let dir = dir.as_ref();
    let mut result = BiopsyResult::new(id);

    let files = discover_image_files(dir, &options.file_filter)?;

    // Validate every name up front so a bad name fails before any work
    let images = files
        .into_iter()
        .map(|path| image_id_from_path(&path).map(|image_id| (path, image_id)))
        .collect::<Result<Vec<_>>>()?;

    for (path, image_id) in images {
        match extract_image_file(&path, image_id) {
            Ok(image) => result.images.push(image),
            Err(e) => match options.error_policy {
                ErrorPolicy::Abort => return Err(e.in_file(path)),
                ErrorPolicy::Skip => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping image file");
                    result.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    tracing::info!(
        biopsy = %result.id,
        images = result.images.len(),
        glomeruli = result.glomerulus_count(),
        skipped = result.skipped.len(),
        "biopsy extracted"
    );

    Ok(result)
}

/// Extract every biopsy directory under `root`, in path order.
///
/// Each subdirectory is one biopsy, identified by its name.
pub fn extract_root(root: impl AsRef<Path>, options: &ExtractOptions) -> Result<RootResult> {
    let root = root.as_ref();

    let biopsies = discover_biopsy_dirs(root)?
        .into_iter()
        .map(|dir| extract_biopsy(biopsy_id_from_dir(&dir), &dir, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(RootResult {
        root: root.to_path_buf(),
        biopsies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NephroError;
    use crate::source::FilterConfig;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "Area\tFeret\tFeretX\tFeretY\tFeretAngle\tMinFeret\n";

    fn export(rows: &[(f64, f64)]) -> String {
        let mut content = HEADER.to_string();
        for (i, (area, feret)) in rows.iter().enumerate() {
            content.push_str(&format!(
                "{}\t{area}\t{feret}\t1.0\t1.0\t1.0\t1.0\n",
                i + 1
            ));
        }
        content
    }

    fn create_biopsy(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("2.xls"),
            export(&[(8734.557, 112.589), (55.939, 10.677), (50.378, 9.949)]),
        )
        .unwrap();
        fs::write(
            dir.join("1.xls"),
            export(&[
                (8914.940, 128.412),
                (23.243, 8.696),
                (6584.420, 115.378),
                (18.238, 5.737),
            ]),
        )
        .unwrap();
        fs::write(dir.join("summary.csv"), "not an export").unwrap();
    }

    #[test]
    fn test_extract_biopsy_concatenates_in_file_order() {
        let temp = tempdir().unwrap();
        create_biopsy(temp.path());

        let result = extract_biopsy("B1", temp.path(), &ExtractOptions::new()).unwrap();

        assert_eq!(result.id, "B1");
        assert_eq!(result.images.len(), 2);
        assert_eq!(result.glomerulus_count(), 3);
        assert_eq!(result.podocyte_count(), 4);
        assert!(result.skipped.is_empty());

        let order: Vec<(u32, u32)> = result
            .glomeruli()
            .map(|g| (g.image_id(), g.number()))
            .collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_extract_empty_biopsy() {
        let temp = tempdir().unwrap();

        let result = extract_biopsy("B0", temp.path(), &ExtractOptions::new()).unwrap();
        assert!(result.images.is_empty());
        assert_eq!(result.glomerulus_count(), 0);
    }

    #[test]
    fn test_invalid_filename_is_fatal() {
        let temp = tempdir().unwrap();
        create_biopsy(temp.path());
        fs::write(temp.path().join("draft.xls"), export(&[(5000.0, 80.0)])).unwrap();

        let options = ExtractOptions::new().on_error(ErrorPolicy::Skip);
        let err = extract_biopsy("B1", temp.path(), &options).unwrap_err();
        assert!(matches!(err, NephroError::InvalidImageFilename(_)));
    }

    #[test]
    fn test_invalid_file_aborts_by_default() {
        let temp = tempdir().unwrap();
        create_biopsy(temp.path());
        fs::write(temp.path().join("3.xls"), export(&[(5000.0, 80.0)])).unwrap();

        let err = extract_biopsy("B1", temp.path(), &ExtractOptions::new()).unwrap_err();

        match &err {
            NephroError::InFile { path, .. } => assert!(path.ends_with("3.xls")),
            other => panic!("Expected InFile, got {other:?}"),
        }
        assert!(matches!(
            err.kind(),
            NephroError::EmptyGlomerulus { image_id: 3, .. }
        ));
    }

    #[test]
    fn test_invalid_file_skipped_with_skip_policy() {
        let temp = tempdir().unwrap();
        create_biopsy(temp.path());
        fs::write(temp.path().join("3.xls"), export(&[(23.0, 8.0)])).unwrap();

        let options = ExtractOptions::new().on_error(ErrorPolicy::Skip);
        let result = extract_biopsy("B1", temp.path(), &options).unwrap();

        assert_eq!(result.images.len(), 2);
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].path.ends_with("3.xls"));
        assert!(result.skipped[0].reason.contains("podocyte"));
    }

    #[test]
    fn test_custom_extension() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("4.txt"),
            export(&[(5000.0, 80.0), (20.0, 5.0)]),
        )
        .unwrap();

        let options = ExtractOptions::new().filter(FilterConfig::new().extension("txt"));
        let result = extract_biopsy("B1", temp.path(), &options).unwrap();

        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].image_id, 4);
    }

    #[test]
    fn test_extract_root() {
        let temp = tempdir().unwrap();
        create_biopsy(&temp.path().join("B2"));
        create_biopsy(&temp.path().join("B1"));
        fs::write(temp.path().join("index.txt"), "").unwrap();

        let result = extract_root(temp.path(), &ExtractOptions::new()).unwrap();

        let ids: Vec<&str> = result.biopsies.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["B1", "B2"]);
        assert_eq!(result.glomerulus_count(), 6);
        assert_eq!(result.podocyte_count(), 8);
    }
}
