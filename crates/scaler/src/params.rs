//! Scaling-Parameter Export Records

use crate::minmax::MinMaxScaler;
use feature_engine::FEATURE_NAMES;
use serde::{Deserialize, Serialize};

/// Tag identifying the scaler kind in the artifact
pub const SCALER_TYPE: &str = "MinMaxScaler";

/// One scaler's parameter arrays, one entry per scaled dimension.
///
/// Field names carry scikit-learn's trailing-underscore attribute names:
/// they are the wire contract the browser runtime reads, not a Rust naming
/// choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub min_: Vec<f64>,
    pub scale_: Vec<f64>,
    pub data_min_: Vec<f64>,
    pub data_max_: Vec<f64>,
    pub data_range_: Vec<f64>,
}

impl From<&MinMaxScaler> for ScalerParams {
    fn from(scaler: &MinMaxScaler) -> Self {
        Self {
            min_: scaler.min_offset.clone(),
            scale_: scaler.scale.clone(),
            data_min_: scaler.data_min.clone(),
            data_max_: scaler.data_max.clone(),
            data_range_: scaler.data_range.clone(),
        }
    }
}

/// The complete scaling artifact consumed by the inference client.
///
/// Carries both fitted scalers, the window/horizon constants used upstream,
/// and the ordered feature-name list so the client never hard-codes any of
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerInfo {
    pub scaler_type: String,
    pub feature_scaler: ScalerParams,
    pub price_scaler: ScalerParams,
    /// Moving-average window used during feature engineering
    pub sequence_length: usize,
    /// Prediction horizon in rows
    pub prediction_steps: usize,
    /// Feature column order, matching the feature scaler's dimensions
    pub features: Vec<String>,
}

impl ScalerInfo {
    /// Assemble the export record from the two fitted scalers.
    ///
    /// The feature-name list comes from the one shared ordering constant;
    /// the feature scaler's width must match it.
    pub fn new(
        feature_scaler: &MinMaxScaler,
        price_scaler: &MinMaxScaler,
        window: usize,
        horizon: usize,
    ) -> Self {
        debug_assert_eq!(feature_scaler.dims(), FEATURE_NAMES.len());
        debug_assert_eq!(price_scaler.dims(), 1);

        Self {
            scaler_type: SCALER_TYPE.to_string(),
            feature_scaler: feature_scaler.into(),
            price_scaler: price_scaler.into(),
            sequence_length: window,
            prediction_steps: horizon,
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minmax::fit_scalers;

    fn fitted() -> (MinMaxScaler, MinMaxScaler) {
        let features = vec![
            [100.0, 250.0, 0.01, 99.0, 240.0],
            [101.0, 300.0, 0.02, 100.0, 260.0],
            [102.0, 200.0, 0.015, 101.0, 250.0],
        ];
        let prices = vec![103.0, 104.0, 105.0];
        fit_scalers(&features, &prices).unwrap()
    }

    #[test]
    fn test_info_carries_constants_and_names() {
        let (fs, ps) = fitted();
        let info = ScalerInfo::new(&fs, &ps, 20, 5);

        assert_eq!(info.scaler_type, "MinMaxScaler");
        assert_eq!(info.sequence_length, 20);
        assert_eq!(info.prediction_steps, 5);
        assert_eq!(
            info.features,
            vec!["close", "volume", "hl_range", "close_ma", "vol_ma"]
        );
        assert_eq!(info.feature_scaler.min_.len(), 5);
        assert_eq!(info.price_scaler.min_.len(), 1);
    }

    #[test]
    fn test_wire_field_names() {
        let (fs, ps) = fitted();
        let info = ScalerInfo::new(&fs, &ps, 20, 5);
        let value = serde_json::to_value(&info).unwrap();

        assert!(value.get("scaler_type").is_some());
        assert!(value.get("sequence_length").is_some());
        assert!(value.get("prediction_steps").is_some());
        let feature_scaler = value.get("feature_scaler").unwrap();
        for key in ["min_", "scale_", "data_min_", "data_max_", "data_range_"] {
            assert!(feature_scaler.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_scale_is_reciprocal_range() {
        let (fs, ps) = fitted();
        let info = ScalerInfo::new(&fs, &ps, 20, 5);

        for (s, r) in info
            .feature_scaler
            .scale_
            .iter()
            .zip(&info.feature_scaler.data_range_)
        {
            if *r != 0.0 {
                assert!((s - 1.0 / r).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_round_trips_through_json() {
        let (fs, ps) = fitted();
        let info = ScalerInfo::new(&fs, &ps, 20, 5);
        let json = serde_json::to_string_pretty(&info).unwrap();
        let back: ScalerInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
