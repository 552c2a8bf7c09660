//! Error types for nephrolib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting biopsy measurements
#[derive(Error, Debug)]
pub enum NephroError {
    /// A measurement line is missing tokens or has a non-numeric token
    #[error("malformed measurement row '{line}': {reason}")]
    MalformedRow { line: String, reason: String },

    /// Area or feret is not strictly positive
    #[error("invalid geometry: area = {area}, feret = {feret} (both must be greater than zero)")]
    InvalidGeometry { area: f64, feret: f64 },

    /// Area falls outside both the podocyte and the glomerulus bands
    #[error("illegal measurement found: area = {area}, imageId = {image_id}")]
    OutOfBandArea { area: f64, image_id: u32 },

    /// A second header line was found
    #[error("double header found in image {image_id}")]
    DuplicateHeader { image_id: u32 },

    /// No header line was seen before finalization
    #[error("header wasn't found in image {image_id}")]
    MissingHeader { image_id: u32 },

    /// Podocyte row appeared before any glomerulus row
    #[error("podocyte (area = {area}) found before any glomerulus in image {image_id}")]
    OrphanPodocyte { area: f64, image_id: u32 },

    /// A glomerulus was sealed without any podocyte
    #[error("glomerulus {number} in image {image_id} has no podocyte data")]
    EmptyGlomerulus { image_id: u32, number: u32 },

    /// No glomerulus row was seen before finalization
    #[error("no glomerulus found in image {image_id}")]
    NoGlomerulusFound { image_id: u32 },

    /// A per-image file's stem is not a positive integer
    #[error("found illegal image data file: {0}")]
    InvalidImageFilename(PathBuf),

    /// Image ids are positive
    #[error("image id must be greater than zero, got {0}")]
    InvalidImageId(u32),

    /// The classifier was already finalized
    #[error("classifier for image {image_id} was already finalized")]
    ClassifierSealed { image_id: u32 },

    /// An error tied to a specific line of an input file
    #[error("line {line_number}: {source}")]
    AtLine {
        line_number: usize,
        #[source]
        source: Box<NephroError>,
    },

    /// An error tied to a specific input file
    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<NephroError>,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NephroError {
    /// Wrap this error with the 1-based line number it occurred on.
    pub fn at_line(self, line_number: usize) -> Self {
        NephroError::AtLine {
            line_number,
            source: Box::new(self),
        }
    }

    /// Wrap this error with the file it occurred in.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        NephroError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The underlying cause, with line and file context stripped.
    pub fn kind(&self) -> &NephroError {
        match self {
            NephroError::AtLine { source, .. } | NephroError::InFile { source, .. } => {
                source.kind()
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_unwraps_context() {
        let err = NephroError::DuplicateHeader { image_id: 3 }
            .at_line(4)
            .in_file("/biopsies/B1/3.xls");

        assert!(matches!(
            err.kind(),
            NephroError::DuplicateHeader { image_id: 3 }
        ));
    }

    #[test]
    fn test_display_includes_context() {
        let err = NephroError::OutOfBandArea {
            area: 0.243,
            image_id: 42,
        }
        .at_line(3)
        .in_file("7.xls");

        let message = err.to_string();
        assert!(message.contains("7.xls"));
        assert!(message.contains("line 3"));
        assert!(message.contains("area = 0.243"));
        assert!(message.contains("imageId = 42"));
    }
}
