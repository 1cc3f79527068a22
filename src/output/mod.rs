//! Output module for exporting harvested records
//!
//! This module handles:
//! - Writing one CSV file per category with a fixed column set
//! - Writing the image download log
//! - Summarizing a run for the console
//!
//! Every file is written to a `.part` sibling and renamed into place, so a
//! reader never sees a half-written CSV.

mod atomic;
mod csv_export;
mod image_log;
pub mod summary;

pub use csv_export::{
    export_categories, export_categories_reserving, write_records, CategoryExport, ExportFailure,
    ExportReport,
};
pub use image_log::{write_image_log, IMAGE_LOG_COLUMNS};
pub use summary::{print_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
