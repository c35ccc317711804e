//! Conversion Run Configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything one conversion run needs: source locations, artifact
/// destinations, and the preprocessing constants. Passed explicitly into
/// the pipeline so tests can point every path at a scratch directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Semicolon-separated 1-minute bar file
    pub dataset_path: PathBuf,
    /// Directory holding trained `.h5` checkpoints
    pub checkpoint_dir: PathBuf,
    /// Destination directory for the converted model
    pub model_dir: PathBuf,
    /// Destination file for the scaling parameters
    pub scaler_path: PathBuf,
    /// Destination file for the demo sample rows
    pub sample_path: PathBuf,
    /// Moving-average window used in feature engineering
    pub window: usize,
    /// Prediction horizon in rows
    pub horizon: usize,
    /// Maximum rows in the exported sample
    pub sample_size: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/nq-1m.csv"),
            checkpoint_dir: PathBuf::from("model_checkpoints"),
            model_dir: PathBuf::from("tfjs_model/model"),
            scaler_path: PathBuf::from("tfjs_model/scaler_info.json"),
            sample_path: PathBuf::from("web_app/sample_data.json"),
            window: 20,
            horizon: 5,
            sample_size: 50,
        }
    }
}
