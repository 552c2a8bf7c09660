//! Output: presentation-ready views of extraction results.
//!
//! The data flow is:
//! 1. Discovery (`source`)
//! 2. Extraction (`data`): `ImageResult`, `BiopsyResult`, `RootResult`
//! 3. Summary (`output`): `SummaryTable`, formatted strings for display
//!
//! Full results serialize to JSON directly; `SummaryTable` is the compact
//! view used for terminal output.

pub mod summary;

pub use summary::{SummaryTable, TableRow};
