//! Source discovery: find biopsy directories and image export files.
//!
//! This module handles the first stage of the pipeline - discovering what
//! to extract. It provides:
//!
//! - **Layout**: biopsy directories under a root, image ids from file names
//! - **File filtering**: select export files by extension and glob patterns
//!
//! ## Example
//!
//! ```rust,ignore
//! use nephrolib::source::{discover_biopsy_dirs, discover_image_files, FilterConfig};
//!
//! let filter = FilterConfig::new().exclude("**/draft-*")?;
//! for dir in discover_biopsy_dirs("/data/biopsies")? {
//!     let files = discover_image_files(&dir, &filter)?;
//! }
//! ```

pub mod filter;
pub mod layout;

pub use filter::{discover_image_files, FilterConfig, DEFAULT_EXTENSION};
pub use layout::{biopsy_id_from_dir, discover_biopsy_dirs, image_id_from_path};
