//! # nephrolib
//!
//! Extracts glomerulus and podocyte measurements from the tabular exports of
//! kidney biopsy image analysis.
//!
//! ## Overview
//!
//! Each export file holds the measurements of one image: a header line, then
//! one row per detected structure with its area and feret diameter. Rows are
//! classified by area:
//!
//! - **Glomerulus**: area in `4000.0..=15000.0` µm², starts a new group
//! - **Podocyte**: area in `5.0..=150.0` µm², belongs to the latest glomerulus
//!
//! Anything else, and any violation of the file layout (missing or repeated
//! header, podocyte before any glomerulus, glomerulus without podocytes),
//! rejects the file.
//!
//! ## Pipeline
//!
//! - [`source`]: find biopsy directories and their image export files
//! - [`data`]: parse rows, classify them, and aggregate per image and biopsy
//! - [`output`]: summary tables for display
//!
//! ## Example
//!
//! ```rust
//! use nephrolib::{extract_root, ExtractOptions, ImageClassifier};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Classify lines directly
//! let glomeruli = ImageClassifier::classify_lines(1, [
//!     "Area\tFeret\tFeretX\tFeretY\tFeretAngle\tMinFeret",
//!     "1\t8914.940\t128.412\t226.768\t248.444\t117.031\t85.135",
//!     "2\t23.243\t8.696\t214.429\t267.119\t57.529\t3.673",
//! ]).unwrap();
//! assert_eq!(glomeruli[0].number(), 1);
//!
//! // Or extract a whole directory of biopsies
//! let root = tempdir().unwrap();
//! fs::create_dir(root.path().join("B1")).unwrap();
//! fs::write(root.path().join("B1/3.xls"), "Area\tFeret\n\
//!     1\t5000\t80\t1\t1\t1\t1\n\
//!     2\t12.5\t4\t1\t1\t1\t1\n").unwrap();
//!
//! let result = extract_root(root.path(), &ExtractOptions::new()).unwrap();
//! assert_eq!(result.biopsies[0].id, "B1");
//! assert_eq!(result.glomerulus_count(), 1);
//! ```

pub mod data;
pub mod error;
pub mod options;
pub mod output;
pub mod source;

pub use data::{
    extract_biopsy, extract_image_file, extract_lines, extract_root, AnatomicStructure,
    BiopsyResult, ClassifierState, GeometryInfo, GlomerulusData, ImageClassifier, ImageResult,
    PodocyteData, RootResult, SkippedFile, StructureKind,
};
pub use error::NephroError;
pub use options::{ErrorPolicy, ExtractOptions};
pub use output::{SummaryTable, TableRow};
pub use source::FilterConfig;

/// Result type for nephrolib operations
pub type Result<T> = std::result::Result<T, NephroError>;
