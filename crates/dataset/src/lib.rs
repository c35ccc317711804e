//! OHLCV Dataset Ingestion
//!
//! Loads semicolon-separated 1-minute bar files and cleans them into
//! timestamp-keyed records for feature engineering.

mod reader;
mod record;

pub use reader::load_records;
pub use record::{CleanedRecord, RawRecord};

use std::path::PathBuf;
use thiserror::Error;

/// Errors during dataset loading
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    SourceMissing(PathBuf),
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("No parsable rows in dataset")]
    Empty,
}
