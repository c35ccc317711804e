//! Min-Max Scaling
//!
//! Fits the normalization parameters the browser runtime needs to scale
//! model inputs and invert model outputs, reproducing the training-time fit.

mod minmax;
mod params;

pub use minmax::{fit_scalers, MinMaxScaler};
pub use params::{ScalerInfo, ScalerParams, SCALER_TYPE};

use thiserror::Error;

/// Errors during scaler fitting
#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("Cannot fit a scaler on zero rows")]
    InsufficientData,
}
