//! Data extraction: parse export files and build the structure hierarchy.
//!
//! This module handles the second stage of the pipeline - turning the lines
//! of each image export into glomeruli and their podocytes. It provides:
//!
//! - **Model**: `GeometryInfo`, `PodocyteData`, `GlomerulusData`
//! - **Parsing**: measurement rows and header detection
//! - **Classification**: the area bands and the per-image state machine
//! - **Extraction**: per-image and per-biopsy entry points
//!
//! ## Example
//!
//! ```rust,ignore
//! use nephrolib::data::{extract_biopsy, ExtractOptions};
//!
//! let result = extract_biopsy("B-0142", "/data/biopsies/B-0142", &ExtractOptions::new())?;
//! println!("{} glomeruli", result.glomerulus_count());
//! ```

pub mod biopsy;
pub mod classifier;
pub mod geometry;
pub mod image;
pub mod row;
pub mod structures;

pub use crate::options::ExtractOptions;
pub use biopsy::{extract_biopsy, extract_root, BiopsyResult, RootResult, SkippedFile};
pub use classifier::{
    ClassifierState, ImageClassifier, StructureKind, MAX_GLOMERULUS_AREA, MAX_PODOCYTE_AREA,
    MIN_GLOMERULUS_AREA, MIN_PODOCYTE_AREA,
};
pub use geometry::GeometryInfo;
pub use image::{extract_image_file, extract_lines, ImageResult};
pub use row::{parse_line, MeasurementRow, ParsedLine};
pub use structures::{AnatomicStructure, GlomerulusData, PodocyteData};
