//! Per-image extraction: run one export file through one classifier.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::NephroError;
use crate::Result;

use super::classifier::ImageClassifier;
use super::structures::GlomerulusData;

/// Glomeruli extracted from a single image file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageResult {
    pub image_id: u32,
    /// Source file, if the image came from disk
    pub path: Option<PathBuf>,
    /// Glomeruli in discovery order
    pub glomeruli: Vec<GlomerulusData>,
}

impl ImageResult {
    pub fn glomerulus_count(&self) -> usize {
        self.glomeruli.len()
    }

    pub fn podocyte_count(&self) -> usize {
        self.glomeruli.iter().map(|g| g.podocyte_count()).sum()
    }
}

/// Feed every line of `reader` into a fresh classifier and finalize it.
///
/// Lines are decoded lossily: exports are not always UTF-8, and only the
/// ASCII header marker and numeric columns matter. Errors raised by a line
/// carry its 1-based line number.
pub fn extract_lines<R: BufRead>(mut reader: R, image_id: u32) -> Result<Vec<GlomerulusData>> {
    let mut classifier = ImageClassifier::new(image_id)?;
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        classifier
            .feed_line(line)
            .map_err(|e| e.at_line(line_number))?;
    }

    classifier.finalize()
}

/// Extract the glomeruli of one image export file.
pub fn extract_image_file(path: impl AsRef<Path>, image_id: u32) -> Result<ImageResult> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| NephroError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), image_id, "extracting image");

    let glomeruli = extract_lines(BufReader::new(file), image_id)?;

    Ok(ImageResult {
        image_id,
        path: Some(path.to_path_buf()),
        glomeruli,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const EXPORT: &str = "Area\tFeret\tFeretX\tFeretY\tFeretAngle\tMinFeret\r\n\
        1\t8914.940\t128.412\t226.768\t248.444\t117.031\t85.135\r\n\
        2\t23.243\t8.696\t214.429\t267.119\t57.529\t3.673\r\n\
        3\t8734.557\t112.589\t274.456\t424.522\t157.537\t103.920\r\n\
        4\t55.939\t10.677\t304.469\t422.522\t141.340\t7.607\r\n";

    #[test]
    fn test_extract_lines_crlf() {
        let glomeruli = extract_lines(Cursor::new(EXPORT), 5).unwrap();
        assert_eq!(glomeruli.len(), 2);
        assert_eq!(glomeruli[1].number(), 2);
        assert_eq!(glomeruli[1].image_id(), 5);
    }

    #[test]
    fn test_extract_lines_without_trailing_newline() {
        let input = EXPORT.trim_end();
        let glomeruli = extract_lines(Cursor::new(input), 5).unwrap();
        assert_eq!(glomeruli.len(), 2);
        assert_eq!(glomeruli[1].podocyte_count(), 1);
    }

    #[test]
    fn test_extract_lines_reports_line_number() {
        let input = format!("{EXPORT}Area\tFeret\n");
        let err = extract_lines(Cursor::new(input), 5).unwrap_err();

        match &err {
            NephroError::AtLine { line_number, .. } => assert_eq!(*line_number, 6),
            other => panic!("Expected AtLine, got {other:?}"),
        }
        assert!(matches!(
            err.kind(),
            NephroError::DuplicateHeader { image_id: 5 }
        ));
    }

    #[test]
    fn test_extract_lines_latin1_header() {
        let mut bytes = b"Area (\xB5m\xB2)\tFeret\n".to_vec();
        bytes.extend_from_slice(b"1\t5000\t80\t1\t1\t1\t1\n2\t12.5\t4\t1\t1\t1\t1\n");

        let glomeruli = extract_lines(Cursor::new(bytes), 1).unwrap();
        assert_eq!(glomeruli.len(), 1);
    }

    #[test]
    fn test_extract_image_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("5.xls");
        fs::write(&path, EXPORT).unwrap();

        let result = extract_image_file(&path, 5).unwrap();
        assert_eq!(result.image_id, 5);
        assert_eq!(result.path.as_deref(), Some(path.as_path()));
        assert_eq!(result.glomerulus_count(), 2);
        assert_eq!(result.podocyte_count(), 2);
    }

    #[test]
    fn test_extract_missing_file() {
        let err = extract_image_file("/nonexistent/1.xls", 1).unwrap_err();
        assert!(matches!(err, NephroError::FileRead { .. }));
    }
}
