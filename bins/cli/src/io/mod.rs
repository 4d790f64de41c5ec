//! File input and output.
//!
//! - `ingest` - sales log and category map CSV loading
//! - `export` - result tables to CSV or JSON

pub mod export;
pub mod ingest;

pub use export::{ExportFormat, export_pivot, export_rows};
pub use ingest::{load_category_map, load_sales};
