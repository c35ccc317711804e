//! Conversion Orchestrator
//!
//! Sequences model export, scaling-parameter export, and sample-data export
//! into one conversion run, and reports per-stage success or failure.

mod artifacts;
mod config;
mod convert;
mod pipeline;
mod sample;

pub use artifacts::write_json_atomic;
pub use config::ConvertConfig;
pub use convert::{
    find_latest_checkpoint, CheckpointCopy, ConvertOutcome, ConvertStrategy, ModelConverter,
    TfjsConverterCli, TfjsPythonModule,
};
pub use pipeline::{ConversionReport, Pipeline, Stage, StageError};
pub use sample::extract_sample;

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Errors during conversion
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Trained model artifact not found in {0}")]
    ModelMissing(PathBuf),
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),
    #[error("Scaler error: {0}")]
    Scaler(#[from] scaler::ScalerError),
    #[error("Converter failed: {0}")]
    Converter(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
