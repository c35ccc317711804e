//! Feature Engineering Engine
//!
//! Derives the model's engineered feature columns and prediction target from
//! cleaned OHLCV rows. Every consumer of the exported model re-derives
//! features through this crate, so the computation here is the single source
//! of truth for train/serve parity.

mod features;
mod rolling;

pub use features::{
    engineer, engineer_labeled, label, EngineeredRecord, LabeledRecord, FEATURE_DIMENSION,
    FEATURE_NAMES,
};
pub use rolling::rolling_mean;
